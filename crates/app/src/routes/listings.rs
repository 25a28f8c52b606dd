//! Listing route handlers.
//!
//! All listing routes require an authenticated session; the extractor
//! provides it and the handlers pass it through to the services.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use feirinha_core::ListingId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{EnrichedListing, Listing, ListingPatch, NewListing};
use crate::state::AppState;

/// Query parameters for the feed.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Whether to include the caller's own listings (first). Defaults
    /// to true.
    #[serde(default = "default_show_own")]
    pub show_own: bool,
}

const fn default_show_own() -> bool {
    true
}

/// Response body for a created listing.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: ListingId,
}

/// `GET /listings`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<EnrichedListing>>> {
    let feed = state
        .feed()
        .annotated_listings(Some(&session), query.show_own)
        .await?;
    Ok(Json(feed))
}

/// `POST /listings`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
    Json(listing): Json<NewListing>,
) -> Result<impl IntoResponse> {
    let id = state.listings().create(&session, &listing).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// `GET /listings/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
    Path(id): Path<ListingId>,
) -> Result<Json<Listing>> {
    let listing = state.listings().get(&session, &id).await?;
    Ok(Json(listing))
}

/// `PATCH /listings/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
    Path(id): Path<ListingId>,
    Json(patch): Json<ListingPatch>,
) -> Result<StatusCode> {
    state.listings().update(&session, &id, &patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /listings/{id}`
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
    Path(id): Path<ListingId>,
) -> Result<StatusCode> {
    state.listings().delete(&session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
