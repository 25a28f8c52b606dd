//! Firestore adapter for the profile collection.
//!
//! Documents live in the `users` collection, keyed by account id, with
//! the wire field names `name`, `telefone`, `endereco`, `email`.

use async_trait::async_trait;

use feirinha_core::UserId;

use crate::models::Profile;
use crate::platform::documents::{Document, Value};
use crate::platform::{AccessToken, FirestoreClient};
use crate::store::{ProfileStore, StoreError};

/// Name of the profile collection.
pub const COLLECTION: &str = "users";

/// Profile store backed by Firestore.
#[derive(Clone)]
pub struct FirestoreProfileStore {
    firestore: FirestoreClient,
}

impl FirestoreProfileStore {
    /// Create a profile store over a Firestore client.
    #[must_use]
    pub const fn new(firestore: FirestoreClient) -> Self {
        Self { firestore }
    }
}

#[async_trait]
impl ProfileStore for FirestoreProfileStore {
    async fn write(&self, profile: &Profile, token: &AccessToken) -> Result<(), StoreError> {
        let document = profile_to_document(profile);
        self.firestore
            .set(COLLECTION, profile.id.as_str(), &document, token)
            .await?;
        Ok(())
    }

    async fn read_one(
        &self,
        id: &UserId,
        token: &AccessToken,
    ) -> Result<Option<Profile>, StoreError> {
        let document = self.firestore.get(COLLECTION, id.as_str(), token).await?;
        Ok(document.map(|doc| document_to_profile(id, &doc)))
    }
}

fn profile_to_document(profile: &Profile) -> Document {
    Document::from_fields([
        ("name", Value::string(&profile.display_name)),
        ("telefone", Value::string(&profile.phone)),
        ("endereco", Value::string(&profile.address)),
        ("email", Value::string(&profile.email)),
    ])
}

/// Profiles default field-by-field to empty strings; the feed applies
/// its display placeholders on top. The id comes from the lookup key,
/// not the document.
fn document_to_profile(id: &UserId, document: &Document) -> Profile {
    let text = |name: &str| -> String {
        document
            .field(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };

    Profile {
        id: id.clone(),
        display_name: text("name"),
        phone: text("telefone"),
        address: text("endereco"),
        email: text("email"),
    }
}
