//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Health check
//!
//! # Auth
//! POST   /auth/register        - Create account and profile, start session
//! POST   /auth/login           - Start session
//! POST   /auth/logout          - End session
//! GET    /auth/me              - Current session context
//!
//! # Listings (require auth)
//! GET    /listings             - Enriched feed (?show_own=true|false)
//! POST   /listings             - Create listing
//! GET    /listings/{id}        - One listing
//! PATCH  /listings/{id}        - Update own listing
//! DELETE /listings/{id}        - Delete own listing
//! ```

pub mod auth;
pub mod listings;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the listing routes router.
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(listings::index).post(listings::create))
        .route(
            "/{id}",
            get(listings::show)
                .patch(listings::update)
                .delete(listings::delete),
        )
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/listings", listing_routes())
}
