//! Firebase platform clients.
//!
//! # Architecture
//!
//! - Firebase is source of truth - NO local sync, direct API calls
//! - Identity Toolkit REST for accounts and credentials
//! - Firestore REST for listing and profile documents
//! - Plain reqwest-JSON clients; no SDK, only the documented wire
//!   contracts
//!
//! # Example
//!
//! ```rust,ignore
//! use feirinha_app::platform::{FirestoreClient, IdentityClient};
//!
//! let identity = IdentityClient::new(&config.firebase);
//! let user = identity.sign_in("maria@example.com", "s3nha!").await?;
//!
//! let firestore = FirestoreClient::new(&config.firebase);
//! let docs = firestore.list("anuncio", &user.token).await?;
//! ```

pub mod documents;
mod firestore;
mod identity;

pub use documents::{Document, Value};
pub use firestore::FirestoreClient;
pub use identity::{AuthenticatedUser, IdentityClient, IdentityProvider};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform returned an error status.
    #[error("platform error {code}: {message}")]
    Api {
        /// HTTP status code from the error envelope.
        code: u16,
        /// Platform error message (e.g. `EMAIL_EXISTS`).
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request carried no valid credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

impl PlatformError {
    /// The platform's error message when this is an API error.
    ///
    /// Identity Toolkit reports failure causes as upper-case codes in
    /// the message field (`EMAIL_EXISTS`, `INVALID_PASSWORD`, ...).
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// An opaque bearer credential issued by the auth service.
///
/// Passed to every Firestore call; also the value persisted by the
/// local token cache. `Debug` is redacted so tokens never reach logs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the Authorization header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Error envelope shared by Identity Toolkit and Firestore responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub(crate) error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub(crate) message: String,
}

/// Decode a non-success platform response into a `PlatformError`.
pub(crate) fn decode_error(status: reqwest::StatusCode, body: &str) -> PlatformError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return PlatformError::Unauthenticated(message);
    }

    PlatformError::Api {
        code: status.as_u16(),
        message,
    }
}
