//! Domain models.
//!
//! Typed records separate from the platform's wire documents. All
//! document-shape defaulting happens in the store adapters; by the
//! time a value is one of these types it is fully formed.

pub mod listing;
pub mod profile;
pub mod session;

pub use listing::{EnrichedListing, Listing, ListingPatch, NewListing};
pub use profile::Profile;
pub use session::Session;
