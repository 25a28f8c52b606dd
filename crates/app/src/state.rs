//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::platform::{FirestoreClient, IdentityClient, IdentityProvider};
use crate::services::{AuthService, FeedRefresher, FeedService, ListingService};
use crate::store::{FirestoreListingStore, FirestoreProfileStore, ListingStore, ProfileStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the services; handlers never
/// touch the stores or platform clients directly.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    auth: AuthService,
    feed: FeedService,
    feed_refresher: FeedRefresher,
    listings: ListingService,
}

impl AppState {
    /// Create the production state: platform clients over the
    /// configured hosts, Firestore-backed stores, services on top.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let firestore = FirestoreClient::new(&config.firebase);
        let identity: Arc<dyn IdentityProvider> = Arc::new(IdentityClient::new(&config.firebase));
        let listing_store: Arc<dyn ListingStore> =
            Arc::new(FirestoreListingStore::new(firestore.clone()));
        let profile_store: Arc<dyn ProfileStore> =
            Arc::new(FirestoreProfileStore::new(firestore));

        Self::with_backends(config, identity, listing_store, profile_store)
    }

    /// Create state over explicit backends. Tests use this to wire in
    /// memory stores and a scripted identity provider.
    #[must_use]
    pub fn with_backends(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
        listing_store: Arc<dyn ListingStore>,
        profile_store: Arc<dyn ProfileStore>,
    ) -> Self {
        let auth = AuthService::new(identity, Arc::clone(&profile_store));
        let feed = FeedService::new(Arc::clone(&listing_store), profile_store);
        let feed_refresher = FeedRefresher::new(feed.clone());
        let listings = ListingService::new(listing_store);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                feed,
                feed_refresher,
                listings,
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the feed service.
    #[must_use]
    pub fn feed(&self) -> &FeedService {
        &self.inner.feed
    }

    /// Get a reference to the sequenced feed refresher.
    #[must_use]
    pub fn feed_refresher(&self) -> &FeedRefresher {
        &self.inner.feed_refresher
    }

    /// Get a reference to the listing service.
    #[must_use]
    pub fn listings(&self) -> &ListingService {
        &self.inner.listings
    }
}
