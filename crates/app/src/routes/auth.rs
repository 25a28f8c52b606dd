//! Authentication route handlers.
//!
//! Registration, login, logout, and session introspection over the
//! auth service. The session context lives in the cookie-backed
//! session; handlers store it on login and drop it on logout.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session as CookieSession;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_session, set_session};
use crate::services::NewAccount;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The session context as returned to clients. The bearer token never
/// leaves the server.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
}

impl From<&crate::models::Session> for SessionResponse {
    fn from(session: &crate::models::Session) -> Self {
        Self {
            user_id: session.user_id.to_string(),
            email: session.email.clone(),
        }
    }
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    cookie_session: CookieSession,
    Json(account): Json<NewAccount>,
) -> Result<impl IntoResponse> {
    let session = state.auth().register(&account).await?;

    set_session(&cookie_session, &session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    set_sentry_user(&session.user_id, Some(&session.email));

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    cookie_session: CookieSession,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state.auth().login(&request.email, &request.password).await?;

    set_session(&cookie_session, &session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    set_sentry_user(&session.user_id, Some(&session.email));

    Ok(Json(SessionResponse::from(&session)))
}

/// `POST /auth/logout`
pub async fn logout(cookie_session: CookieSession) -> Result<StatusCode> {
    clear_session(&cookie_session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/me`
pub async fn me(RequireAuth(session): RequireAuth) -> Json<SessionResponse> {
    Json(SessionResponse::from(&session))
}
