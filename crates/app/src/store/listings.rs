//! Firestore adapter for the listing collection.
//!
//! Documents live in the `anuncio` collection with the field names the
//! product has always used on the wire: `title`, `description`,
//! `preco`, `fotos`, `userId`.

use async_trait::async_trait;
use tracing::warn;

use feirinha_core::{ListingId, PhotoSet, Price, UserId};

use crate::models::{Listing, ListingPatch, NewListing};
use crate::platform::documents::{Document, Value};
use crate::platform::{AccessToken, FirestoreClient};
use crate::store::{ListingStore, StoreError};

/// Name of the listing collection.
pub const COLLECTION: &str = "anuncio";

/// Fallback title for documents missing one.
const TITLE_UNAVAILABLE: &str = "Título não disponível";
/// Fallback description for documents missing one.
const DESCRIPTION_UNAVAILABLE: &str = "Descrição não disponível";

/// Listing store backed by Firestore.
#[derive(Clone)]
pub struct FirestoreListingStore {
    firestore: FirestoreClient,
}

impl FirestoreListingStore {
    /// Create a listing store over a Firestore client.
    #[must_use]
    pub const fn new(firestore: FirestoreClient) -> Self {
        Self { firestore }
    }
}

#[async_trait]
impl ListingStore for FirestoreListingStore {
    async fn create(
        &self,
        listing: &NewListing,
        owner: &UserId,
        token: &AccessToken,
    ) -> Result<ListingId, StoreError> {
        let document = new_listing_to_document(listing, owner);
        let created = self.firestore.create(COLLECTION, &document, token).await?;
        let id = created
            .id()
            .ok_or_else(|| StoreError::Corrupt("created document has no name".to_string()))?;
        Ok(ListingId::new(id))
    }

    async fn read_all(&self, token: &AccessToken) -> Result<Vec<Listing>, StoreError> {
        let documents = self.firestore.list(COLLECTION, token).await?;
        documents.into_iter().map(document_to_listing).collect()
    }

    async fn read_one(
        &self,
        id: &ListingId,
        token: &AccessToken,
    ) -> Result<Option<Listing>, StoreError> {
        match self.firestore.get(COLLECTION, id.as_str(), token).await? {
            Some(document) => Ok(Some(document_to_listing(document)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
        token: &AccessToken,
    ) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }
        let (document, field_paths) = patch_to_document(patch);
        self.firestore
            .patch(COLLECTION, id.as_str(), &document, &field_paths, token)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &ListingId, token: &AccessToken) -> Result<(), StoreError> {
        self.firestore.delete(COLLECTION, id.as_str(), token).await?;
        Ok(())
    }
}

// =============================================================================
// Document conversions
// =============================================================================

fn new_listing_to_document(listing: &NewListing, owner: &UserId) -> Document {
    Document::from_fields([
        ("title", Value::string(&listing.title)),
        ("description", Value::string(&listing.description)),
        ("preco", Value::double(listing.price.to_f64())),
        ("fotos", Value::string_array(listing.photos.iter())),
        ("userId", Value::string(owner.as_str())),
    ])
}

fn patch_to_document(patch: &ListingPatch) -> (Document, Vec<&'static str>) {
    let mut fields = Vec::new();
    let mut paths = Vec::new();

    if let Some(title) = &patch.title {
        fields.push(("title", Value::string(title)));
        paths.push("title");
    }
    if let Some(description) = &patch.description {
        fields.push(("description", Value::string(description)));
        paths.push("description");
    }
    if let Some(price) = &patch.price {
        fields.push(("preco", Value::double(price.to_f64())));
        paths.push("preco");
    }
    if let Some(photos) = &patch.photos {
        fields.push(("fotos", Value::string_array(photos.iter())));
        paths.push("fotos");
    }

    (Document::from_fields(fields), paths)
}

/// Convert a stored document into a listing, applying the product's
/// defaulting rules for loosely shaped documents. Only a missing id is
/// corruption; every field falls back.
fn document_to_listing(document: Document) -> Result<Listing, StoreError> {
    let id = document
        .id()
        .ok_or_else(|| StoreError::Corrupt("listing document has no name".to_string()))?
        .to_owned();

    let price = match document.field("preco").and_then(Value::as_f64) {
        Some(raw) => Price::from_f64(raw).unwrap_or_else(|e| {
            warn!(listing_id = %id, error = %e, "stored price invalid, defaulting to zero");
            Price::ZERO
        }),
        None => Price::ZERO,
    };

    let text_field = |name: &str, fallback: &str| -> String {
        match document.field(name).and_then(Value::as_str) {
            Some(value) if !value.is_empty() => value.to_owned(),
            _ => fallback.to_owned(),
        }
    };

    Ok(Listing {
        title: text_field("title", TITLE_UNAVAILABLE),
        description: text_field("description", DESCRIPTION_UNAVAILABLE),
        price,
        photos: document
            .field("fotos")
            .and_then(Value::as_string_array)
            .map(PhotoSet::from)
            .unwrap_or_default(),
        owner_id: UserId::new(
            document
                .field("userId")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        ),
        id: ListingId::new(id),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stored_document(json: &str) -> Document {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_document_to_listing_full() {
        let doc = stored_document(
            r#"{
                "name": "projects/p/databases/(default)/documents/anuncio/a1",
                "fields": {
                    "title": {"stringValue": "Bike"},
                    "description": {"stringValue": "Aro 29"},
                    "preco": {"doubleValue": 150.0},
                    "fotos": {"arrayValue": {"values": [{"stringValue": "file:///f.jpg"}]}},
                    "userId": {"stringValue": "u1"}
                }
            }"#,
        );

        let listing = document_to_listing(doc).unwrap();
        assert_eq!(listing.id, ListingId::new("a1"));
        assert_eq!(listing.title, "Bike");
        assert_eq!(listing.price, Price::from_f64(150.0).unwrap());
        assert_eq!(listing.photos.as_slice(), &["file:///f.jpg"]);
        assert_eq!(listing.owner_id, UserId::new("u1"));
    }

    #[test]
    fn test_document_to_listing_defaults() {
        let doc = stored_document(
            r#"{"name": "projects/p/databases/(default)/documents/anuncio/a2", "fields": {}}"#,
        );

        let listing = document_to_listing(doc).unwrap();
        assert_eq!(listing.title, "Título não disponível");
        assert_eq!(listing.description, "Descrição não disponível");
        assert_eq!(listing.price, Price::ZERO);
        assert!(listing.photos.is_empty());
        assert!(listing.owner_id.is_empty());
    }

    #[test]
    fn test_document_to_listing_negative_price_defaults_to_zero() {
        let doc = stored_document(
            r#"{
                "name": "projects/p/databases/(default)/documents/anuncio/a3",
                "fields": {"preco": {"doubleValue": -5.0}}
            }"#,
        );

        let listing = document_to_listing(doc).unwrap();
        assert_eq!(listing.price, Price::ZERO);
    }

    #[test]
    fn test_document_to_listing_integer_price() {
        // Loosely typed writers store whole prices as integers.
        let doc = stored_document(
            r#"{
                "name": "projects/p/databases/(default)/documents/anuncio/a4",
                "fields": {"preco": {"integerValue": "150"}}
            }"#,
        );

        let listing = document_to_listing(doc).unwrap();
        assert_eq!(listing.price, Price::from_f64(150.0).unwrap());
    }

    #[test]
    fn test_document_without_name_is_corrupt() {
        let doc = stored_document(r#"{"fields": {}}"#);
        assert!(matches!(
            document_to_listing(doc),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_new_listing_document_shape() {
        let listing = NewListing {
            title: "Bike".to_string(),
            description: "Aro 29".to_string(),
            price: Price::from_f64(150.0).unwrap(),
            photos: ["file:///f.jpg"].into_iter().collect(),
        };

        let doc = new_listing_to_document(&listing, &UserId::new("u1"));
        assert_eq!(doc.field("title").and_then(Value::as_str), Some("Bike"));
        assert_eq!(doc.field("preco").and_then(Value::as_f64), Some(150.0));
        assert_eq!(doc.field("userId").and_then(Value::as_str), Some("u1"));
        assert!(doc.name.is_none());
    }

    #[test]
    fn test_patch_document_masks_only_set_fields() {
        let patch = ListingPatch {
            title: Some("Bicicleta".to_string()),
            price: Some(Price::from_f64(120.0).unwrap()),
            ..ListingPatch::default()
        };

        let (doc, paths) = patch_to_document(&patch);
        assert_eq!(paths, vec!["title", "preco"]);
        assert!(doc.field("description").is_none());
        assert_eq!(
            doc.field("title").and_then(Value::as_str),
            Some("Bicicleta")
        );
    }
}
