//! CLI command implementations.

pub mod auth;
pub mod listings;

use thiserror::Error;

use feirinha_app::config::{AppConfig, ConfigError};
use feirinha_app::models::Session;
use feirinha_app::services::{AuthError, FeedError, ListingError};
use feirinha_app::state::AppState;
use feirinha_app::token_cache::{TokenCache, TokenCacheError};

/// Errors a CLI command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// The feed could not be loaded.
    #[error("{0}")]
    Feed(#[from] FeedError),

    /// A listing operation failed.
    #[error("{0}")]
    Listing(#[from] ListingError),

    /// The credential cache could not be read or written.
    #[error("{0}")]
    TokenCache(#[from] TokenCacheError),

    /// No cached credential, or the cached one no longer validates.
    #[error("not logged in; run `feirinha login` first")]
    NotLoggedIn,

    /// The asking price is not representable.
    #[error("invalid price: {0}")]
    Price(#[from] feirinha_core::PriceError),

    /// Reading the confirmation prompt failed.
    #[error("could not read confirmation: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Everything a command needs: the services and the credential cache.
pub struct Context {
    pub state: AppState,
    pub cache: TokenCache,
}

impl Context {
    /// Load configuration and build the services.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] when required environment
    /// variables are missing or malformed.
    pub fn from_env() -> Result<Self, CliError> {
        let config = AppConfig::from_env()?;
        let cache = TokenCache::new(&config.token_file);
        let state = AppState::new(config);
        Ok(Self { state, cache })
    }

    /// Resume the cached session, failing if there is none or the
    /// credential no longer validates.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NotLoggedIn`] when no session can be
    /// resumed.
    pub async fn require_session(&self) -> Result<Session, CliError> {
        let Some(token) = self.cache.load()? else {
            return Err(CliError::NotLoggedIn);
        };

        match self.state.auth().resume(&token).await? {
            Some(session) => Ok(session),
            None => {
                // Dead credential; drop it so the next failure is clean.
                self.cache.clear()?;
                Err(CliError::NotLoggedIn)
            }
        }
    }
}
