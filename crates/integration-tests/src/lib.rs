//! Integration test harness for Feirinha.
//!
//! Wires the real services and router over in-memory stores and a
//! scripted identity provider, so the tests exercise everything except
//! the platform's REST surface. No network, no external state.
//!
//! ```bash
//! cargo test -p feirinha-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::routing::get;
use secrecy::SecretString;

use feirinha_core::UserId;

use feirinha_app::config::{AppConfig, FirebaseConfig};
use feirinha_app::middleware::create_session_layer;
use feirinha_app::platform::{AccessToken, AuthenticatedUser, IdentityProvider, PlatformError};
use feirinha_app::routes;
use feirinha_app::state::AppState;
use feirinha_app::store::memory::{MemoryListingStore, MemoryProfileStore};
use feirinha_app::store::{ListingStore, ProfileStore};

/// Scripted identity provider.
///
/// Accounts live in a map keyed by email. Tokens embed the email so
/// `lookup` can invert them without extra state. The same failure
/// codes the real platform uses come back as [`PlatformError::Api`].
#[derive(Default)]
pub struct StubIdentity {
    accounts: Mutex<HashMap<String, String>>,
}

impl StubIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts created so far.
    ///
    /// # Panics
    ///
    /// Panics if the account map lock is poisoned.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.lock().expect("lock poisoned").len()
    }

    fn user(email: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId::new(format!("uid-{email}")),
            email: email.to_owned(),
            token: AccessToken::new(format!("token-for-{email}")),
        }
    }

    fn api_error(message: &str) -> PlatformError {
        PlatformError::Api {
            code: 400,
            message: message.to_owned(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, PlatformError> {
        let mut accounts = self.accounts.lock().expect("lock poisoned");
        if accounts.contains_key(email) {
            return Err(Self::api_error("EMAIL_EXISTS"));
        }
        if password.len() < 6 {
            return Err(Self::api_error(
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }
        accounts.insert(email.to_owned(), password.to_owned());
        Ok(Self::user(email))
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, PlatformError> {
        let accounts = self.accounts.lock().expect("lock poisoned");
        match accounts.get(email) {
            Some(stored) if stored == password => Ok(Self::user(email)),
            Some(_) => Err(Self::api_error("INVALID_LOGIN_CREDENTIALS")),
            None => Err(Self::api_error("EMAIL_NOT_FOUND")),
        }
    }

    async fn lookup(
        &self,
        token: &AccessToken,
    ) -> Result<Option<AuthenticatedUser>, PlatformError> {
        let accounts = self.accounts.lock().expect("lock poisoned");
        Ok(token
            .expose()
            .strip_prefix("token-for-")
            .filter(|email| accounts.contains_key(*email))
            .map(Self::user))
    }
}

/// The assembled application over in-memory backends, with handles to
/// the backends for direct inspection and fault injection.
pub struct TestContext {
    pub state: AppState,
    pub identity: Arc<StubIdentity>,
    pub listings: Arc<MemoryListingStore>,
    pub profiles: Arc<MemoryProfileStore>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let identity = Arc::new(StubIdentity::new());
        let listings = Arc::new(MemoryListingStore::new());
        let profiles = Arc::new(MemoryProfileStore::new());

        let state = AppState::with_backends(
            test_config(),
            Arc::clone(&identity) as Arc<dyn IdentityProvider>,
            Arc::clone(&listings) as Arc<dyn ListingStore>,
            Arc::clone(&profiles) as Arc<dyn ProfileStore>,
        );

        Self {
            state,
            identity,
            listings,
            profiles,
        }
    }

    /// Build the full router, sessions included, for in-process
    /// request tests via `tower::ServiceExt::oneshot`.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(|| async { "ok" }))
            .merge(routes::routes())
            .layer(create_session_layer())
            .with_state(self.state.clone())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        firebase: FirebaseConfig {
            project_id: "feirinha-test".to_string(),
            api_key: SecretString::from("AIzaTest"),
            database_id: "(default)".to_string(),
            auth_host: "http://localhost:9099".to_string(),
            firestore_host: "http://localhost:8080".to_string(),
        },
        token_file: ".feirinha-token-test".to_string(),
        sentry_dsn: None,
    }
}
