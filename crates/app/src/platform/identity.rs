//! Identity Toolkit REST client.
//!
//! The auth service mints and validates credentials; this client only
//! speaks its documented request/response contract. Failure causes
//! arrive as upper-case codes in the error message (`EMAIL_EXISTS`,
//! `INVALID_LOGIN_CREDENTIALS`) and are surfaced unchanged through
//! [`PlatformError::Api`]; mapping them to user-facing failures is the
//! auth service layer's job.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use feirinha_core::UserId;

use crate::config::FirebaseConfig;
use crate::platform::{AccessToken, PlatformError, decode_error};

/// A user as authenticated by the platform.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The platform-assigned account id (`localId`).
    pub user_id: UserId,
    /// The account email, as the platform normalized it.
    pub email: String,
    /// Bearer credential for subsequent store calls.
    pub token: AccessToken,
}

/// The credential operations the auth service needs.
///
/// A trait so tests can substitute a scripted identity backend for the
/// REST client.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Mint a new account.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, PlatformError>;

    /// Exchange email and password for a credential.
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, PlatformError>;

    /// Resolve the user behind a cached credential, if it still
    /// validates.
    async fn lookup(&self, token: &AccessToken)
    -> Result<Option<AuthenticatedUser>, PlatformError>;
}

/// Client for the Identity Toolkit accounts API.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    base: String,
    api_key: SecretString,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
}

impl IdentityClient {
    /// Create a new Identity Toolkit client.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client: reqwest::Client::new(),
                base: format!("{}/v1", config.auth_host),
                api_key: config.api_key.clone(),
            }),
        }
    }

    async fn credentials_call(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, PlatformError> {
        let body = self
            .post(
                endpoint,
                &CredentialsRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        let response: CredentialsResponse = serde_json::from_str(&body)?;

        Ok(AuthenticatedUser {
            user_id: UserId::new(response.local_id),
            email: response.email,
            token: AccessToken::new(response.id_token),
        })
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<String, PlatformError> {
        let url = format!("{}/{endpoint}", self.inner.base);
        let response = self
            .inner
            .client
            .post(&url)
            .query(&[("key", self.inner.api_key.expose_secret())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(decode_error(status, &text));
        }

        Ok(text)
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    /// `PlatformError::Api` with message `EMAIL_EXISTS` for duplicate
    /// emails; other `PlatformError` variants for transport or
    /// platform failures.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, PlatformError> {
        let user = self
            .credentials_call("accounts:signUp", email, password)
            .await?;
        debug!(user_id = %user.user_id, "account created");
        Ok(user)
    }

    /// `PlatformError::Api` with message `EMAIL_NOT_FOUND`,
    /// `INVALID_PASSWORD`, or `INVALID_LOGIN_CREDENTIALS` for bad
    /// credentials; other variants for transport failures.
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, PlatformError> {
        self.credentials_call("accounts:signInWithPassword", email, password)
            .await
    }

    /// An invalid or expired token surfaces as `Ok(None)` when the
    /// platform says so in-band, or as `PlatformError::Api` when it
    /// rejects the call outright.
    async fn lookup(
        &self,
        token: &AccessToken,
    ) -> Result<Option<AuthenticatedUser>, PlatformError> {
        let body = self
            .post(
                "accounts:lookup",
                &LookupRequest {
                    id_token: token.expose(),
                },
            )
            .await?;
        let response: LookupResponse = serde_json::from_str(&body)?;

        Ok(response
            .users
            .into_iter()
            .next()
            .map(|user| AuthenticatedUser {
                user_id: UserId::new(user.local_id),
                email: user.email,
                token: token.clone(),
            }))
    }
}
