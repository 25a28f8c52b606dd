//! Listing ("anúncio") domain types.

use serde::{Deserialize, Serialize};

use feirinha_core::{ListingId, PhotoSet, Price, UserId};

use crate::models::profile::Profile;

/// A classified ad, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Store-assigned id.
    pub id: ListingId,
    /// Short title shown in the feed.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Asking price.
    pub price: Price,
    /// Photo URIs in selection order, at most 5.
    pub photos: PhotoSet,
    /// The account that created the listing.
    pub owner_id: UserId,
}

/// Fields for creating a listing. The store assigns the id; the
/// session supplies the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub photos: PhotoSet,
}

/// A partial update to an owned listing. `None` fields are left
/// untouched by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<PhotoSet>,
}

impl ListingPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.photos.is_none()
    }
}

/// A listing merged with its owner's contact details for display.
///
/// Enrichment never fails: a missing profile or field falls back to
/// the fixed placeholder strings below. The feed must render every
/// listing, so absent contact details are policy, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedListing {
    #[serde(flatten)]
    pub listing: Listing,
    /// Seller's address, or [`Self::ADDRESS_UNAVAILABLE`].
    pub seller_address: String,
    /// Seller's phone, or [`Self::PHONE_UNAVAILABLE`].
    pub seller_phone: String,
    /// Seller's email, or [`Self::EMAIL_UNAVAILABLE`].
    pub seller_email: String,
}

impl EnrichedListing {
    /// Placeholder when the seller's address is unknown.
    pub const ADDRESS_UNAVAILABLE: &'static str = "Endereço não disponível";
    /// Placeholder when the seller's phone is unknown.
    pub const PHONE_UNAVAILABLE: &'static str = "Telefone não disponível";
    /// Placeholder when the seller's email is unknown.
    pub const EMAIL_UNAVAILABLE: &'static str = "E-mail não disponível";

    /// Merge a listing with its owner's profile, if one resolved.
    #[must_use]
    pub fn merge(listing: Listing, profile: Option<&Profile>) -> Self {
        let field = |value: Option<&str>, fallback: &str| -> String {
            match value {
                Some(v) if !v.is_empty() => v.to_owned(),
                _ => fallback.to_owned(),
            }
        };

        Self {
            seller_address: field(
                profile.map(|p| p.address.as_str()),
                Self::ADDRESS_UNAVAILABLE,
            ),
            seller_phone: field(profile.map(|p| p.phone.as_str()), Self::PHONE_UNAVAILABLE),
            seller_email: field(profile.map(|p| p.email.as_str()), Self::EMAIL_UNAVAILABLE),
            listing,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bike(owner: &str) -> Listing {
        Listing {
            id: ListingId::new("a1"),
            title: "Bike".to_string(),
            description: "Aro 29".to_string(),
            price: Price::from_f64(150.0).unwrap(),
            photos: PhotoSet::new(),
            owner_id: UserId::new(owner),
        }
    }

    #[test]
    fn test_merge_with_profile_copies_fields_exactly() {
        let profile = Profile {
            id: UserId::new("u1"),
            display_name: "Maria".to_string(),
            phone: "11 99999-0000".to_string(),
            address: "Rua das Flores, 1".to_string(),
            email: "maria@example.com".to_string(),
        };

        let enriched = EnrichedListing::merge(bike("u1"), Some(&profile));
        assert_eq!(enriched.seller_address, "Rua das Flores, 1");
        assert_eq!(enriched.seller_phone, "11 99999-0000");
        assert_eq!(enriched.seller_email, "maria@example.com");
    }

    #[test]
    fn test_merge_without_profile_uses_placeholders() {
        let enriched = EnrichedListing::merge(bike("u2"), None);
        assert_eq!(enriched.seller_address, "Endereço não disponível");
        assert_eq!(enriched.seller_phone, "Telefone não disponível");
        assert_eq!(enriched.seller_email, "E-mail não disponível");
    }

    #[test]
    fn test_merge_with_empty_profile_fields_uses_placeholders() {
        let profile = Profile {
            id: UserId::new("u1"),
            display_name: "Maria".to_string(),
            phone: String::new(),
            address: String::new(),
            email: "maria@example.com".to_string(),
        };

        let enriched = EnrichedListing::merge(bike("u1"), Some(&profile));
        assert_eq!(enriched.seller_address, EnrichedListing::ADDRESS_UNAVAILABLE);
        assert_eq!(enriched.seller_phone, EnrichedListing::PHONE_UNAVAILABLE);
        assert_eq!(enriched.seller_email, "maria@example.com");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ListingPatch::default().is_empty());
        assert!(
            !ListingPatch {
                title: Some("Bicicleta".to_string()),
                ..ListingPatch::default()
            }
            .is_empty()
        );
    }
}
