//! Listing photo collection.
//!
//! Photos are opaque URIs selected by the user, in selection order.
//! A listing carries at most [`PhotoSet::MAX_PHOTOS`] of them; anything
//! beyond that is silently dropped, no matter how many picker rounds
//! the selections came from.

use serde::{Deserialize, Serialize};

/// An ordered set of photo URIs, capped at 5 entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PhotoSet(Vec<String>);

impl PhotoSet {
    /// Maximum number of photos a listing can carry.
    pub const MAX_PHOTOS: usize = 5;

    /// An empty photo set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a photo URI, keeping selection order.
    ///
    /// Returns `false` (and drops the URI) when the set is already full.
    pub fn push(&mut self, uri: impl Into<String>) -> bool {
        if self.0.len() >= Self::MAX_PHOTOS {
            return false;
        }
        self.0.push(uri.into());
        true
    }

    /// Add URIs from another selection round, truncating at the cap.
    pub fn extend<I>(&mut self, uris: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for uri in uris {
            if !self.push(uri) {
                break;
            }
        }
    }

    /// Remove the photo at `index`, preserving the order of the rest.
    ///
    /// Out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.0.len() {
            self.0.remove(index);
        }
    }

    /// The photo URIs in selection order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the photo URIs.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of photos in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no photos.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the set is at the 5-photo cap.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.len() >= Self::MAX_PHOTOS
    }
}

impl From<Vec<String>> for PhotoSet {
    fn from(mut uris: Vec<String>) -> Self {
        uris.truncate(Self::MAX_PHOTOS);
        Self(uris)
    }
}

impl From<PhotoSet> for Vec<String> {
    fn from(photos: PhotoSet) -> Self {
        photos.0
    }
}

impl<S: Into<String>> FromIterator<S> for PhotoSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut photos = Self::new();
        photos.extend(iter);
        photos
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_push_caps_at_five() {
        let mut photos = PhotoSet::new();
        for i in 0..5 {
            assert!(photos.push(format!("file:///photo-{i}.jpg")));
        }
        assert!(photos.is_full());
        assert!(!photos.push("file:///photo-6.jpg"));
        assert_eq!(photos.len(), 5);
    }

    #[test]
    fn test_repeated_selection_rounds_truncate() {
        // Two picker invocations of three photos each land on the cap.
        let mut photos = PhotoSet::new();
        photos.extend(["a", "b", "c"]);
        photos.extend(["d", "e", "f"]);
        assert_eq!(photos.len(), 5);
        assert_eq!(photos.as_slice(), &["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_selection_order_preserved() {
        let photos: PhotoSet = ["z", "a", "m"].into_iter().collect();
        assert_eq!(photos.as_slice(), &["z", "a", "m"]);
    }

    #[test]
    fn test_remove() {
        let mut photos: PhotoSet = ["a", "b", "c"].into_iter().collect();
        photos.remove(1);
        assert_eq!(photos.as_slice(), &["a", "c"]);

        // Out of range is a no-op.
        photos.remove(9);
        assert_eq!(photos.len(), 2);
    }

    #[test]
    fn test_deserialize_truncates() {
        let json = "[\"1\",\"2\",\"3\",\"4\",\"5\",\"6\",\"7\"]";
        let photos: PhotoSet = serde_json::from_str(json).unwrap();
        assert_eq!(photos.len(), 5);
    }

    #[test]
    fn test_serde_roundtrip() {
        let photos: PhotoSet = ["a", "b"].into_iter().collect();
        let json = serde_json::to_string(&photos).unwrap();
        assert_eq!(json, "[\"a\",\"b\"]");
        let parsed: PhotoSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, photos);
    }
}
