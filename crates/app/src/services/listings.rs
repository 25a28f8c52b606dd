//! Listing mutations with ownership enforcement.
//!
//! Creation stamps the session's user id as the owner. Update and
//! delete first read the listing back and compare owners, so a caller
//! can never mutate someone else's listing even if it guesses the id.
//! Delete confirmation is the caller's concern; by the time a call
//! reaches this service the decision has been made.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use feirinha_core::ListingId;

use crate::models::{Listing, ListingPatch, NewListing, Session};
use crate::store::{ListingStore, StoreError};

/// Errors that can occur while mutating listings.
#[derive(Debug, Error)]
pub enum ListingError {
    /// No listing with the given id.
    #[error("listing not found")]
    NotFound,

    /// The listing belongs to another user.
    #[error("listing belongs to another user")]
    NotOwner,

    /// The store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create, read, update, and delete listings on behalf of a session.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ListingStore>,
}

impl ListingService {
    /// Create a listing service over the store.
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    /// Create a listing owned by the session's user.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn create(
        &self,
        session: &Session,
        listing: &NewListing,
    ) -> Result<ListingId, ListingError> {
        let id = self
            .store
            .create(listing, &session.user_id, &session.token)
            .await?;
        info!(listing_id = %id, owner = %session.user_id, "listing created");
        Ok(id)
    }

    /// Read one listing by id.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::NotFound`] when no such listing exists.
    pub async fn get(&self, session: &Session, id: &ListingId) -> Result<Listing, ListingError> {
        self.store
            .read_one(id, &session.token)
            .await?
            .ok_or(ListingError::NotFound)
    }

    /// Patch a listing the session's user owns.
    ///
    /// An empty patch is a no-op that still performs the ownership
    /// check, so a caller learns about a stale id either way.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::NotFound`] for unknown ids and
    /// [`ListingError::NotOwner`] for listings owned by someone else.
    pub async fn update(
        &self,
        session: &Session,
        id: &ListingId,
        patch: &ListingPatch,
    ) -> Result<(), ListingError> {
        self.require_owned(session, id).await?;
        if patch.is_empty() {
            return Ok(());
        }
        self.store.update(id, patch, &session.token).await?;
        info!(listing_id = %id, "listing updated");
        Ok(())
    }

    /// Delete a listing the session's user owns.
    ///
    /// # Errors
    ///
    /// Same ownership errors as [`Self::update`].
    pub async fn delete(&self, session: &Session, id: &ListingId) -> Result<(), ListingError> {
        self.require_owned(session, id).await?;
        self.store.delete(id, &session.token).await?;
        info!(listing_id = %id, "listing deleted");
        Ok(())
    }

    async fn require_owned(&self, session: &Session, id: &ListingId) -> Result<(), ListingError> {
        let listing = self.get(session, id).await?;
        if listing.owner_id == session.user_id {
            Ok(())
        } else {
            Err(ListingError::NotOwner)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use feirinha_core::{PhotoSet, Price, UserId};

    use crate::platform::AccessToken;
    use crate::store::memory::MemoryListingStore;

    fn session(user_id: &str) -> Session {
        Session {
            user_id: UserId::new(user_id),
            email: format!("{user_id}@example.com"),
            token: AccessToken::new("test-token"),
        }
    }

    fn new_listing(title: &str) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: "desc".to_string(),
            price: Price::from_f64(10.0).unwrap(),
            photos: PhotoSet::new(),
        }
    }

    fn service() -> (Arc<MemoryListingStore>, ListingService) {
        let store = Arc::new(MemoryListingStore::new());
        let service = ListingService::new(Arc::clone(&store) as Arc<dyn ListingStore>);
        (store, service)
    }

    #[tokio::test]
    async fn test_create_stamps_session_owner() {
        let (_, service) = service();
        let session = session("u1");

        let id = service.create(&session, &new_listing("Bike")).await.unwrap();
        let listing = service.get(&session, &id).await.unwrap();

        assert_eq!(listing.owner_id, UserId::new("u1"));
        assert_eq!(listing.title, "Bike");
    }

    #[tokio::test]
    async fn test_update_applies_patch_to_own_listing() {
        let (_, service) = service();
        let session = session("u1");
        let id = service.create(&session, &new_listing("Bike")).await.unwrap();

        let patch = ListingPatch {
            title: Some("Bicicleta".to_string()),
            price: Some(Price::from_f64(120.0).unwrap()),
            ..ListingPatch::default()
        };
        service.update(&session, &id, &patch).await.unwrap();

        let listing = service.get(&session, &id).await.unwrap();
        assert_eq!(listing.title, "Bicicleta");
        assert_eq!(listing.price, Price::from_f64(120.0).unwrap());
        assert_eq!(listing.description, "desc");
    }

    #[tokio::test]
    async fn test_update_rejects_foreign_listing() {
        let (_, service) = service();
        let owner = session("u1");
        let intruder = session("u2");
        let id = service.create(&owner, &new_listing("Bike")).await.unwrap();

        let patch = ListingPatch {
            title: Some("Roubada".to_string()),
            ..ListingPatch::default()
        };
        let result = service.update(&intruder, &id, &patch).await;

        assert!(matches!(result, Err(ListingError::NotOwner)));
        let listing = service.get(&owner, &id).await.unwrap();
        assert_eq!(listing.title, "Bike");
    }

    #[tokio::test]
    async fn test_delete_removes_own_listing() {
        let (_, service) = service();
        let session = session("u1");
        let id = service.create(&session, &new_listing("Bike")).await.unwrap();

        service.delete(&session, &id).await.unwrap();

        let result = service.get(&session, &id).await;
        assert!(matches!(result, Err(ListingError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_listing() {
        let (_, service) = service();
        let owner = session("u1");
        let intruder = session("u2");
        let id = service.create(&owner, &new_listing("Bike")).await.unwrap();

        let result = service.delete(&intruder, &id).await;

        assert!(matches!(result, Err(ListingError::NotOwner)));
        assert!(service.get(&owner, &id).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (_, service) = service();
        let session = session("u1");

        let result = service.delete(&session, &ListingId::new("missing")).await;
        assert!(matches!(result, Err(ListingError::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_patch_is_a_checked_noop() {
        let (_, service) = service();
        let session = session("u1");
        let id = service.create(&session, &new_listing("Bike")).await.unwrap();

        service
            .update(&session, &id, &ListingPatch::default())
            .await
            .unwrap();

        let result = service
            .update(&session, &ListingId::new("missing"), &ListingPatch::default())
            .await;
        assert!(matches!(result, Err(ListingError::NotFound)));
    }
}
