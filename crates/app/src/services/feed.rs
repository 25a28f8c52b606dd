//! The listing feed aggregator.
//!
//! Reads every listing, joins each with its owner's profile, and
//! partitions the result into the current user's own listings and
//! everyone else's. Own listings come first when the display flag is
//! set; otherwise only the others are returned. Within each partition
//! the store's read-all order is preserved.
//!
//! Profile resolution degrades, never fails: a missing profile or an
//! errored profile read yields the placeholder contact fields. The
//! only failure that propagates is the listing read-all itself.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use feirinha_core::UserId;

use crate::models::{EnrichedListing, Profile, Session};
use crate::store::{ListingStore, ProfileStore, StoreError};

/// Errors that can occur while aggregating the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The listing read-all failed; nothing could be aggregated.
    #[error("fetch failed: {0}")]
    Fetch(#[source] StoreError),
}

/// Aggregates listings with their owners' contact details.
#[derive(Clone)]
pub struct FeedService {
    listings: Arc<dyn ListingStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl FeedService {
    /// Create a feed service over the two stores.
    pub fn new(listings: Arc<dyn ListingStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { listings, profiles }
    }

    /// Build the enriched, partitioned feed for the given session.
    ///
    /// `None` (or a session with an empty user id) yields an empty
    /// feed without touching the stores - there is nothing to key the
    /// partition on.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Fetch`] only when the listing read-all
    /// fails. Profile reads never fail the aggregation.
    pub async fn annotated_listings(
        &self,
        session: Option<&Session>,
        show_own: bool,
    ) -> Result<Vec<EnrichedListing>, FeedError> {
        let Some(session) = session.filter(|s| !s.user_id.is_empty()) else {
            return Ok(Vec::new());
        };

        let listings = self
            .listings
            .read_all(&session.token)
            .await
            .map_err(FeedError::Fetch)?;

        let profiles = self.resolve_profiles(&listings, session).await;

        let mut own = Vec::new();
        let mut others = Vec::new();
        for listing in listings {
            let profile = profiles.get(&listing.owner_id);
            let mine = listing.owner_id == session.user_id;
            let enriched = EnrichedListing::merge(listing, profile);
            if mine {
                own.push(enriched);
            } else {
                others.push(enriched);
            }
        }

        debug!(
            own = own.len(),
            others = others.len(),
            show_own,
            "aggregated feed"
        );

        if show_own {
            own.extend(others);
            Ok(own)
        } else {
            Ok(others)
        }
    }

    /// Fetch the profile of every distinct owner, concurrently.
    ///
    /// The reads are independent; only the merge is order-sensitive,
    /// and it keys by owner id rather than completion order.
    async fn resolve_profiles(
        &self,
        listings: &[crate::models::Listing],
        session: &Session,
    ) -> HashMap<UserId, Profile> {
        let mut seen = HashSet::new();
        let owners: Vec<UserId> = listings
            .iter()
            .map(|listing| listing.owner_id.clone())
            .filter(|owner| !owner.is_empty() && seen.insert(owner.clone()))
            .collect();

        let lookups = owners.into_iter().map(|owner| {
            let profiles = Arc::clone(&self.profiles);
            let token = session.token.clone();
            async move {
                match profiles.read_one(&owner, &token).await {
                    Ok(profile) => (owner, profile),
                    Err(error) => {
                        // Degrade to placeholders; the feed must render
                        // every listing.
                        warn!(%owner, %error, "profile read failed");
                        (owner, None)
                    }
                }
            }
        });

        join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(owner, profile)| profile.map(|p| (owner, p)))
            .collect()
    }
}

/// Guards the feed against stale refresh results.
///
/// A refresh superseded by a newer one (rapid toggling of the display
/// flag, say) still runs to completion, but its result is discarded
/// rather than overwriting the newer feed. Sequencing is a single
/// monotonically increasing counter; there is no cancellation.
pub struct FeedRefresher {
    service: FeedService,
    sequence: AtomicU64,
}

impl FeedRefresher {
    /// Wrap a feed service with refresh sequencing.
    #[must_use]
    pub const fn new(service: FeedService) -> Self {
        Self {
            service,
            sequence: AtomicU64::new(0),
        }
    }

    /// Run a refresh; `Ok(None)` means a newer refresh started while
    /// this one was in flight and its result should be dropped.
    ///
    /// # Errors
    ///
    /// Propagates [`FeedError`] from the aggregation.
    pub async fn refresh(
        &self,
        session: Option<&Session>,
        show_own: bool,
    ) -> Result<Option<Vec<EnrichedListing>>, FeedError> {
        let seq = self.begin();
        let feed = self.service.annotated_listings(session, show_own).await?;
        if self.is_current(seq) {
            Ok(Some(feed))
        } else {
            Ok(None)
        }
    }

    fn begin(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, seq: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == seq
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use feirinha_core::{PhotoSet, Price};

    use crate::models::NewListing;
    use crate::platform::AccessToken;
    use crate::store::memory::{MemoryListingStore, MemoryProfileStore};

    struct Fixture {
        listings: Arc<MemoryListingStore>,
        profiles: Arc<MemoryProfileStore>,
        feed: FeedService,
    }

    impl Fixture {
        fn new() -> Self {
            let listings = Arc::new(MemoryListingStore::new());
            let profiles = Arc::new(MemoryProfileStore::new());
            let feed = FeedService::new(
                Arc::clone(&listings) as Arc<dyn ListingStore>,
                Arc::clone(&profiles) as Arc<dyn ProfileStore>,
            );
            Self {
                listings,
                profiles,
                feed,
            }
        }

        fn session(user_id: &str) -> Session {
            Session {
                user_id: UserId::new(user_id),
                email: format!("{user_id}@example.com"),
                token: AccessToken::new("test-token"),
            }
        }

        async fn add_listing(&self, title: &str, price: f64, owner: &str) {
            self.listings
                .create(
                    &NewListing {
                        title: title.to_string(),
                        description: String::new(),
                        price: Price::from_f64(price).unwrap(),
                        photos: PhotoSet::new(),
                    },
                    &UserId::new(owner),
                    &AccessToken::new("test-token"),
                )
                .await
                .unwrap();
        }

        async fn add_profile(&self, user_id: &str, address: &str, phone: &str, email: &str) {
            self.profiles
                .write(
                    &Profile {
                        id: UserId::new(user_id),
                        display_name: user_id.to_string(),
                        phone: phone.to_string(),
                        address: address.to_string(),
                        email: email.to_string(),
                    },
                    &AccessToken::new("test-token"),
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_no_session_yields_empty_feed() {
        let fx = Fixture::new();
        fx.add_listing("Bike", 150.0, "u1").await;

        let feed = fx.feed.annotated_listings(None, true).await.unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_empty_user_id_yields_empty_feed() {
        let fx = Fixture::new();
        fx.add_listing("Bike", 150.0, "u1").await;

        let session = Fixture::session("");
        let feed = fx
            .feed
            .annotated_listings(Some(&session), true)
            .await
            .unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_own_listing_comes_first() {
        // Scenario: u1 creates "Bike" at 150.0; aggregation with
        // show_own=true returns it first.
        let fx = Fixture::new();
        fx.add_listing("Sofá", 300.0, "u2").await;
        fx.add_listing("Bike", 150.0, "u1").await;

        let session = Fixture::session("u1");
        let feed = fx
            .feed
            .annotated_listings(Some(&session), true)
            .await
            .unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].listing.title, "Bike");
        assert_eq!(feed[0].listing.price, Price::from_f64(150.0).unwrap());
        assert_eq!(feed[0].listing.owner_id, UserId::new("u1"));
        assert_eq!(feed[1].listing.title, "Sofá");
    }

    #[tokio::test]
    async fn test_show_own_false_excludes_own_partition() {
        let fx = Fixture::new();
        fx.add_listing("Bike", 150.0, "u1").await;
        fx.add_listing("Sofá", 300.0, "u2").await;

        let session = Fixture::session("u1");
        let feed = fx
            .feed
            .annotated_listings(Some(&session), false)
            .await
            .unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].listing.title, "Sofá");
    }

    #[tokio::test]
    async fn test_partitions_preserve_read_order() {
        let fx = Fixture::new();
        fx.add_listing("a", 1.0, "u2").await;
        fx.add_listing("b", 2.0, "u1").await;
        fx.add_listing("c", 3.0, "u2").await;
        fx.add_listing("d", 4.0, "u1").await;

        let session = Fixture::session("u1");
        let feed = fx
            .feed
            .annotated_listings(Some(&session), true)
            .await
            .unwrap();

        let titles: Vec<&str> = feed.iter().map(|e| e.listing.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "a", "c"]);
    }

    #[tokio::test]
    async fn test_enrichment_copies_profile_fields_exactly() {
        let fx = Fixture::new();
        fx.add_listing("Bike", 150.0, "u2").await;
        fx.add_profile("u2", "Rua A, 2", "11 98888-7777", "u2@example.com")
            .await;

        let session = Fixture::session("u1");
        let feed = fx
            .feed
            .annotated_listings(Some(&session), true)
            .await
            .unwrap();

        assert_eq!(feed[0].seller_address, "Rua A, 2");
        assert_eq!(feed[0].seller_phone, "11 98888-7777");
        assert_eq!(feed[0].seller_email, "u2@example.com");
    }

    #[tokio::test]
    async fn test_missing_profile_degrades_to_placeholders() {
        // Scenario: listing owned by u2 with no profile record.
        let fx = Fixture::new();
        fx.add_listing("Bike", 150.0, "u2").await;

        let session = Fixture::session("u1");
        let feed = fx
            .feed
            .annotated_listings(Some(&session), true)
            .await
            .unwrap();

        assert_eq!(feed[0].seller_email, "E-mail não disponível");
        assert_eq!(feed[0].seller_address, "Endereço não disponível");
        assert_eq!(feed[0].seller_phone, "Telefone não disponível");
    }

    #[tokio::test]
    async fn test_errored_profile_read_degrades_to_placeholders() {
        let fx = Fixture::new();
        fx.add_listing("Bike", 150.0, "u2").await;
        fx.add_profile("u2", "Rua A, 2", "11 98888-7777", "u2@example.com")
            .await;
        fx.profiles.fail_reads(true);

        let session = Fixture::session("u1");
        let feed = fx
            .feed
            .annotated_listings(Some(&session), true)
            .await
            .unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].seller_email, "E-mail não disponível");
    }

    #[tokio::test]
    async fn test_failed_read_all_propagates() {
        let fx = Fixture::new();
        fx.listings.fail_reads(true);

        let session = Fixture::session("u1");
        let result = fx.feed.annotated_listings(Some(&session), true).await;
        assert!(matches!(result, Err(FeedError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_partition_is_exhaustive_and_disjoint() {
        let fx = Fixture::new();
        for (title, owner) in [("a", "u1"), ("b", "u2"), ("c", "u3"), ("d", "u1")] {
            fx.add_listing(title, 1.0, owner).await;
        }

        let session = Fixture::session("u1");
        let all = fx
            .feed
            .annotated_listings(Some(&session), true)
            .await
            .unwrap();
        let others = fx
            .feed
            .annotated_listings(Some(&session), false)
            .await
            .unwrap();

        // Every listing appears exactly once in the combined feed, and
        // the others-only feed is the combined feed minus own entries.
        assert_eq!(all.len(), 4);
        assert_eq!(others.len(), 2);
        assert!(
            others
                .iter()
                .all(|e| e.listing.owner_id != UserId::new("u1"))
        );
    }

    #[tokio::test]
    async fn test_refresher_publishes_current_result() {
        let fx = Fixture::new();
        fx.add_listing("Bike", 150.0, "u1").await;
        let refresher = FeedRefresher::new(fx.feed.clone());

        let session = Fixture::session("u1");
        let feed = refresher.refresh(Some(&session), true).await.unwrap();
        assert_eq!(feed.map(|f| f.len()), Some(1));
    }

    #[tokio::test]
    async fn test_refresher_discards_superseded_result() {
        let fx = Fixture::new();
        let refresher = FeedRefresher::new(fx.feed.clone());

        let first = refresher.begin();
        let second = refresher.begin();

        assert!(!refresher.is_current(first));
        assert!(refresher.is_current(second));
    }
}
