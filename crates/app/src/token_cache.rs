//! File-backed credential cache.
//!
//! Persists the single opaque bearer token between runs so a user is
//! not asked to log in every time. The token is stored verbatim in one
//! file; validity is decided by the identity provider at resume time,
//! never locally.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::platform::AccessToken;

/// Errors reading or writing the cached token.
#[derive(Debug, Error)]
pub enum TokenCacheError {
    #[error("token cache io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single-token cache backed by one file.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Create a cache at the given path. Nothing is touched until the
    /// first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the cached token, if one was saved.
    ///
    /// A missing file means no token; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TokenCacheError::Io`] for failures other than the
    /// file not existing.
    pub fn load(&self) -> Result<Option<AccessToken>, TokenCacheError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(AccessToken::new(raw)))
                }
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Save a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TokenCacheError::Io`] when the write fails.
    pub fn save(&self, token: &AccessToken) -> Result<(), TokenCacheError> {
        fs::write(&self.path, token.expose()).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), "token cached");
        Ok(())
    }

    /// Remove the cached token. Removing a token that was never saved
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TokenCacheError::Io`] for failures other than the
    /// file not existing.
    pub fn clear(&self) -> Result<(), TokenCacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "token cache cleared");
                Ok(())
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// The file this cache reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> TokenCacheError {
        TokenCacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
