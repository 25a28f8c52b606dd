//! Session context.
//!
//! The authenticated-user context for one app run. Created on
//! successful sign-in, cleared on sign-out, and passed explicitly to
//! every store and service operation - there is no ambient "current
//! user" lookup anywhere in this codebase.

use serde::{Deserialize, Serialize};

use feirinha_core::UserId;

use crate::platform::{AccessToken, AuthenticatedUser};

/// The authenticated user's context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in account id.
    pub user_id: UserId,
    /// The signed-in account email.
    pub email: String,
    /// Bearer credential for store calls.
    pub token: AccessToken,
}

impl From<AuthenticatedUser> for Session {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            token: user.token,
        }
    }
}

/// Session keys for data stored in the cookie-backed session.
pub mod keys {
    /// Key for storing the current [`super::Session`].
    pub const CURRENT_SESSION: &str = "current_session";
}
