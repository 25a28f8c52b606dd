//! Registration, login, and session resumption.
//!
//! Registration is two platform writes with no transaction between
//! them: mint the account, then overwrite the profile document. When
//! the second write fails the account stays live and the error says
//! so; a later profile rewrite heals it. Rolling the account back is
//! not possible through the credential API this system uses.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use feirinha_core::Email;

use crate::models::{Profile, Session};
use crate::platform::{AccessToken, IdentityProvider, PlatformError};
use crate::store::ProfileStore;

/// Everything a new user supplies at registration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub phone: String,
    pub address: String,
}

/// Registration, login, and credential resumption over the identity
/// provider and the profile store.
#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl AuthService {
    /// Create an auth service over the identity provider and profile
    /// store.
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Mint an account and write its profile.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidEmail`] before any platform call;
    /// [`AuthError::AccountExists`] and [`AuthError::WeakPassword`]
    /// from the identity provider; [`AuthError::ProfileWrite`] when the
    /// account was created but the profile write failed.
    pub async fn register(&self, account: &NewAccount) -> Result<Session, AuthError> {
        let email = Email::parse(&account.email)?;

        let user = self
            .identity
            .sign_up(email.as_str(), &account.password)
            .await
            .map_err(AuthError::from_platform)?;

        let profile = Profile {
            id: user.user_id.clone(),
            display_name: account.display_name.clone(),
            phone: account.phone.clone(),
            address: account.address.clone(),
            email: user.email.clone(),
        };
        if let Err(source) = self.profiles.write(&profile, &user.token).await {
            warn!(user_id = %user.user_id, %source, "profile write failed after sign-up");
            return Err(AuthError::ProfileWrite {
                user_id: user.user_id,
                source,
            });
        }

        info!(user_id = %user.user_id, "account registered");
        Ok(Session::from(user))
    }

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for wrong email or password;
    /// [`AuthError::InvalidEmail`] for input that is not an email at
    /// all.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .identity
            .sign_in(email.as_str(), password)
            .await
            .map_err(AuthError::from_platform)?;

        info!(user_id = %user.user_id, "login");
        Ok(Session::from(user))
    }

    /// Rebuild a session from a cached credential.
    ///
    /// `Ok(None)` means the credential no longer validates and the
    /// user must log in again; only transport and unexpected platform
    /// failures are errors.
    ///
    /// # Errors
    ///
    /// [`AuthError::Platform`] for failures other than an invalid or
    /// expired credential.
    pub async fn resume(&self, token: &AccessToken) -> Result<Option<Session>, AuthError> {
        match self.identity.lookup(token).await {
            Ok(user) => Ok(user.map(Session::from)),
            Err(error) if is_dead_credential(&error) => Ok(None),
            Err(error) => Err(AuthError::Platform(error)),
        }
    }
}

/// Whether a lookup failure means the credential itself is dead, as
/// opposed to the call failing.
fn is_dead_credential(error: &PlatformError) -> bool {
    if matches!(error, PlatformError::Unauthenticated(_)) {
        return true;
    }
    error.api_message().is_some_and(|message| {
        message.starts_with("INVALID_ID_TOKEN")
            || message.starts_with("TOKEN_EXPIRED")
            || message.starts_with("USER_NOT_FOUND")
            || message.starts_with("USER_DISABLED")
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use feirinha_core::UserId;

    use crate::platform::AuthenticatedUser;
    use crate::store::memory::MemoryProfileStore;

    /// Scripted identity backend. Accounts live in a map keyed by
    /// email; tokens are derived from the email so lookup can invert
    /// them.
    #[derive(Default)]
    struct StubIdentity {
        accounts: Mutex<HashMap<String, String>>,
    }

    impl StubIdentity {
        fn token_email(token: &AccessToken) -> Option<&str> {
            token.expose().strip_prefix("token-for-")
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
            Ok(Self::token_email(token)
                .filter(|email| accounts.contains_key(*email))
                .map(Self::user))
        }
    }

    fn fixture() -> (Arc<StubIdentity>, Arc<MemoryProfileStore>, AuthService) {
        let identity = Arc::new(StubIdentity::default());
        let profiles = Arc::new(MemoryProfileStore::new());
        let service = AuthService::new(
            Arc::clone(&identity) as Arc<dyn IdentityProvider>,
            Arc::clone(&profiles) as Arc<dyn ProfileStore>,
        );
        (identity, profiles, service)
    }

    fn maria() -> NewAccount {
        NewAccount {
            email: "maria@example.com".to_owned(),
            password: "s3nha-boa".to_owned(),
            display_name: "Maria".to_owned(),
            phone: "11 99999-0000".to_owned(),
            address: "Rua das Flores, 1".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_account_and_profile() {
        let (_, profiles, service) = fixture();

        let session = service.register(&maria()).await.unwrap();

        assert_eq!(session.email, "maria@example.com");
        let profile = profiles
            .read_one(&session.user_id, &session.token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.display_name, "Maria");
        assert_eq!(profile.email, "maria@example.com");
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email_locally() {
        let (identity, _, service) = fixture();

        let result = service
            .register(&NewAccount {
                email: "not-an-email".to_owned(),
                ..maria()
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
        assert!(identity.accounts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (_, _, service) = fixture();
        service.register(&maria()).await.unwrap();

        let result = service.register(&maria()).await;
        assert!(matches!(result, Err(AuthError::AccountExists)));
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let (_, _, service) = fixture();

        let result = service
            .register(&NewAccount {
                password: "123".to_owned(),
                ..maria()
            })
            .await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_register_profile_write_failure_leaves_account_live() {
        let (_, profiles, service) = fixture();
        profiles.fail_writes(true);

        let result = service.register(&maria()).await;
        assert!(matches!(result, Err(AuthError::ProfileWrite { .. })));

        // No rollback: the account exists and login succeeds even
        // though the profile document was never written.
        profiles.fail_writes(false);
        let session = service
            .login("maria@example.com", "s3nha-boa")
            .await
            .unwrap();
        assert!(
            profiles
                .read_one(&session.user_id, &session.token)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (_, _, service) = fixture();
        service.register(&maria()).await.unwrap();

        let result = service.login("maria@example.com", "errada").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let (_, _, service) = fixture();

        let result = service.login("ninguem@example.com", "s3nha-boa").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_resume_valid_token() {
        let (_, _, service) = fixture();
        let session = service.register(&maria()).await.unwrap();

        let resumed = service.resume(&session.token).await.unwrap().unwrap();
        assert_eq!(resumed.user_id, session.user_id);
    }

    #[tokio::test]
    async fn test_resume_unknown_token() {
        let (_, _, service) = fixture();

        let resumed = service.resume(&AccessToken::new("stale")).await.unwrap();
        assert!(resumed.is_none());
    }

    #[test]
    fn test_dead_credential_detection() {
        assert!(is_dead_credential(&PlatformError::Unauthenticated(
            "expired".to_owned()
        )));
        assert!(is_dead_credential(&StubIdentity::api_error(
            "TOKEN_EXPIRED"
        )));
        assert!(!is_dead_credential(&StubIdentity::api_error(
            "QUOTA_EXCEEDED"
        )));
    }
}
