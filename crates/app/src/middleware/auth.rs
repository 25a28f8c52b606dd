//! Authentication extractors.
//!
//! Route handlers take [`RequireAuth`] or [`OptionalAuth`] instead of
//! reading the cookie session themselves. Everything downstream of the
//! extractor receives the [`Session`] context explicitly.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session as CookieSession;

use crate::models::Session;
use crate::models::session::keys;

/// Extractor that requires an authenticated session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(session): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", session.email)
/// }
/// ```
pub struct RequireAuth(pub Session);

/// Rejection for requests without a valid session.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Not logged in").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let cookie_session = parts
            .extensions
            .get::<CookieSession>()
            .ok_or(AuthRejection)?;

        let session: Session = cookie_session
            .get(keys::CURRENT_SESSION)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(session))
    }
}

/// Extractor that optionally gets the current session.
///
/// Unlike `RequireAuth`, this does not reject unauthenticated requests.
pub struct OptionalAuth(pub Option<Session>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = match parts.extensions.get::<CookieSession>() {
            Some(cookie_session) => cookie_session
                .get::<Session>(keys::CURRENT_SESSION)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(session))
    }
}

/// Store the session context after a successful login or registration.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session(
    cookie_session: &CookieSession,
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    cookie_session.insert(keys::CURRENT_SESSION, session).await
}

/// Clear the session context (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_session(
    cookie_session: &CookieSession,
) -> Result<(), tower_sessions::session::Error> {
    cookie_session.remove::<Session>(keys::CURRENT_SESSION).await?;
    Ok(())
}
