//! Authentication failure taxonomy.

use thiserror::Error;

use feirinha_core::{EmailError, UserId};

use crate::platform::PlatformError;
use crate::store::StoreError;

/// Errors that can occur during registration, login, or session
/// resumption.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email failed local validation before any platform call.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Wrong email or password. The platform reports several distinct
    /// codes for this; they collapse into one variant so responses
    /// never reveal whether the account exists.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("account already exists")]
    AccountExists,

    /// The platform rejected the password as too weak.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The account was created but its profile write failed. The
    /// account is live; the user can sign in, and the feed shows
    /// placeholder contact details until the profile is rewritten.
    #[error("profile write failed for {user_id}")]
    ProfileWrite {
        user_id: UserId,
        #[source]
        source: StoreError,
    },

    /// Transport or platform failure not captured above.
    #[error(transparent)]
    Platform(PlatformError),
}

impl AuthError {
    /// Map an identity platform failure onto the auth taxonomy.
    ///
    /// The platform encodes the cause as an upper-case code at the
    /// start of the error message, sometimes followed by detail text
    /// (`WEAK_PASSWORD : Password should be at least 6 characters`).
    #[must_use]
    pub fn from_platform(error: PlatformError) -> Self {
        let Some(message) = error.api_message() else {
            return Self::Platform(error);
        };

        if message.starts_with("EMAIL_EXISTS") {
            Self::AccountExists
        } else if message.starts_with("WEAK_PASSWORD") {
            Self::WeakPassword(message.to_owned())
        } else if message.starts_with("EMAIL_NOT_FOUND")
            || message.starts_with("INVALID_PASSWORD")
            || message.starts_with("INVALID_LOGIN_CREDENTIALS")
            || message.starts_with("USER_DISABLED")
        {
            Self::InvalidCredentials
        } else {
            Self::Platform(error)
        }
    }
}
