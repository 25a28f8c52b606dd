//! In-memory store fakes.
//!
//! Used by service and integration tests in place of the Firestore
//! adapters. They mimic the platform's observable contract: insertion
//! order is preserved by read-all, empty bearer tokens are rejected,
//! and reads can be made to fail to exercise degradation paths.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use feirinha_core::{ListingId, UserId};

use crate::models::{Listing, ListingPatch, NewListing, Profile};
use crate::platform::{AccessToken, PlatformError};
use crate::store::{ListingStore, ProfileStore, StoreError};

fn require_token(token: &AccessToken) -> Result<(), StoreError> {
    if token.expose().is_empty() {
        return Err(StoreError::Platform(PlatformError::Unauthenticated(
            "missing bearer token".to_string(),
        )));
    }
    Ok(())
}

fn injected_failure() -> StoreError {
    StoreError::Platform(PlatformError::Api {
        code: 503,
        message: "injected failure".to_string(),
    })
}

/// In-memory [`ListingStore`].
#[derive(Default)]
pub struct MemoryListingStore {
    listings: RwLock<Vec<Listing>>,
    next_id: AtomicU64,
    fail_reads: AtomicBool,
}

impl MemoryListingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail with a platform error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        Ok(())
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn create(
        &self,
        listing: &NewListing,
        owner: &UserId,
        token: &AccessToken,
    ) -> Result<ListingId, StoreError> {
        require_token(token)?;
        let id = ListingId::new(format!("listing-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        let mut listings = self.listings.write().expect("lock poisoned");
        listings.push(Listing {
            id: id.clone(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            photos: listing.photos.clone(),
            owner_id: owner.clone(),
        });
        Ok(id)
    }

    async fn read_all(&self, token: &AccessToken) -> Result<Vec<Listing>, StoreError> {
        require_token(token)?;
        self.check_reads()?;
        Ok(self.listings.read().expect("lock poisoned").clone())
    }

    async fn read_one(
        &self,
        id: &ListingId,
        token: &AccessToken,
    ) -> Result<Option<Listing>, StoreError> {
        require_token(token)?;
        self.check_reads()?;
        Ok(self
            .listings
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|listing| &listing.id == id)
            .cloned())
    }

    async fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
        token: &AccessToken,
    ) -> Result<(), StoreError> {
        require_token(token)?;
        let mut listings = self.listings.write().expect("lock poisoned");
        if let Some(listing) = listings.iter_mut().find(|listing| &listing.id == id) {
            if let Some(title) = &patch.title {
                listing.title = title.clone();
            }
            if let Some(description) = &patch.description {
                listing.description = description.clone();
            }
            if let Some(price) = patch.price {
                listing.price = price;
            }
            if let Some(photos) = &patch.photos {
                listing.photos = photos.clone();
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &ListingId, token: &AccessToken) -> Result<(), StoreError> {
        require_token(token)?;
        self.listings
            .write()
            .expect("lock poisoned")
            .retain(|listing| &listing.id != id);
        Ok(())
    }
}

/// In-memory [`ProfileStore`].
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<UserId, Profile>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryProfileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail with a platform error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail with a platform error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn write(&self, profile: &Profile, token: &AccessToken) -> Result<(), StoreError> {
        require_token(token)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        self.profiles
            .write()
            .expect("lock poisoned")
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn read_one(
        &self,
        id: &UserId,
        token: &AccessToken,
    ) -> Result<Option<Profile>, StoreError> {
        require_token(token)?;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        Ok(self.profiles.read().expect("lock poisoned").get(id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use feirinha_core::{PhotoSet, Price};

    fn token() -> AccessToken {
        AccessToken::new("test-token")
    }

    fn new_listing(title: &str) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: String::new(),
            price: Price::ZERO,
            photos: PhotoSet::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_preserves_order() {
        let store = MemoryListingStore::new();
        let owner = UserId::new("u1");
        store.create(&new_listing("first"), &owner, &token()).await.unwrap();
        store.create(&new_listing("second"), &owner, &token()).await.unwrap();

        let all = store.read_all(&token()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "first");
        assert_eq!(all[1].title, "second");
        assert_ne!(all[0].id, all[1].id);
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let store = MemoryListingStore::new();
        let result = store.read_all(&AccessToken::new("")).await;
        assert!(matches!(
            result,
            Err(StoreError::Platform(PlatformError::Unauthenticated(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_patches_only_set_fields() {
        let store = MemoryListingStore::new();
        let owner = UserId::new("u1");
        let id = store
            .create(&new_listing("Bike"), &owner, &token())
            .await
            .unwrap();

        store
            .update(
                &id,
                &ListingPatch {
                    price: Some(Price::from_f64(99.0).unwrap()),
                    ..ListingPatch::default()
                },
                &token(),
            )
            .await
            .unwrap();

        let listing = store.read_one(&id, &token()).await.unwrap().unwrap();
        assert_eq!(listing.title, "Bike");
        assert_eq!(listing.price, Price::from_f64(99.0).unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_listing() {
        let store = MemoryListingStore::new();
        let owner = UserId::new("u1");
        let id = store
            .create(&new_listing("Bike"), &owner, &token())
            .await
            .unwrap();

        store.delete(&id, &token()).await.unwrap();
        assert!(store.read_one(&id, &token()).await.unwrap().is_none());
    }
}
