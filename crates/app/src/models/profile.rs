//! User profile domain type.

use serde::{Deserialize, Serialize};

use feirinha_core::UserId;

/// A user's contact record, keyed by account id.
///
/// Exactly one per user: written once at registration, updated only by
/// whole-document overwrite (last write wins), never deleted by this
/// system. The email is duplicated here from the auth account because
/// the feed reads seller contact details from profiles alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Equal to the owning account's id.
    pub id: UserId,
    /// Name shown to other users.
    pub display_name: String,
    /// Contact phone number, free-form.
    pub phone: String,
    /// Contact address, free-form.
    pub address: String,
    /// Contact email.
    pub email: String,
}
