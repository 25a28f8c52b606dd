//! Store-boundary adapters.
//!
//! The only place that knows how domain records map onto platform
//! documents. Defaulting for loosely shaped documents happens here, at
//! the boundary, so call sites always see fully formed records.
//!
//! Stores are traits so the services can run against the Firestore
//! adapters in production and the in-memory fakes in tests.

pub mod listings;
pub mod memory;
pub mod profiles;

pub use listings::FirestoreListingStore;
pub use profiles::FirestoreProfileStore;

use async_trait::async_trait;
use thiserror::Error;

use feirinha_core::{ListingId, UserId};

use crate::models::{Listing, ListingPatch, NewListing, Profile};
use crate::platform::{AccessToken, PlatformError};

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The platform call failed.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// A stored document is missing data this system requires.
    #[error("stored document corrupt: {0}")]
    Corrupt(String),
}

/// The listing collection: create, read-one, read-all, update, delete.
///
/// Every call takes the session's access token; the platform rejects
/// unauthenticated calls. `read_all` is deliberately unpaginated - the
/// feed reads the whole collection in one response, and dataset growth
/// beyond that is out of scope for this system.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Create a listing owned by `owner`; the store assigns the id.
    async fn create(
        &self,
        listing: &NewListing,
        owner: &UserId,
        token: &AccessToken,
    ) -> Result<ListingId, StoreError>;

    /// Read every listing, in the store's response order.
    async fn read_all(&self, token: &AccessToken) -> Result<Vec<Listing>, StoreError>;

    /// Read one listing by id.
    async fn read_one(
        &self,
        id: &ListingId,
        token: &AccessToken,
    ) -> Result<Option<Listing>, StoreError>;

    /// Patch the non-`None` fields of a listing.
    async fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
        token: &AccessToken,
    ) -> Result<(), StoreError>;

    /// Delete a listing by id.
    async fn delete(&self, id: &ListingId, token: &AccessToken) -> Result<(), StoreError>;
}

/// The profile collection: overwrite-only writes, read-one.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Write a profile keyed by its user id, overwriting any previous
    /// document (last write wins).
    async fn write(&self, profile: &Profile, token: &AccessToken) -> Result<(), StoreError>;

    /// Read one profile by user id.
    async fn read_one(
        &self,
        id: &UserId,
        token: &AccessToken,
    ) -> Result<Option<Profile>, StoreError>;
}
