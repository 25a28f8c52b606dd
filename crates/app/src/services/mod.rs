//! Application services.
//!
//! Services compose the store adapters and the identity client into
//! the operations the screens call. Each takes the [`crate::models::
//! Session`] explicitly; none of them reads ambient auth state.

pub mod auth;
pub mod feed;
pub mod listings;

pub use auth::{AuthError, AuthService, NewAccount};
pub use feed::{FeedError, FeedRefresher, FeedService};
pub use listings::{ListingError, ListingService};
