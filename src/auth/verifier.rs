//! Credential verification and token issuance.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use validator::Validate;

use super::{JwtSecret, PasswordService, RegisterRequest};
use crate::db::UserStore;
use crate::error::{AppError, AppResult};
use crate::models::UserRecord;

/// Checks a credential pair against the user store and issues a token.
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    passwords: PasswordService,
    tokens: JwtSecret,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>, passwords: PasswordService, tokens: JwtSecret) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub fn tokens(&self) -> &JwtSecret {
        &self.tokens
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Verify `email`/`password` and return a signed token for the user.
    ///
    /// Unknown email and wrong password both yield
    /// [`AppError::InvalidCredentials`]; an unknown email still costs one
    /// password verification.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let Some(user) = self.users.find_by_email(email).await? else {
            self.passwords.verify_dummy(password);
            debug!("login rejected: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !PasswordService::verify_password(password, &user.password_hash)? {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        info!(user_id = %user.id, "login succeeded");
        Ok(token)
    }

    /// Create a user with a freshly hashed password.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<UserRecord> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self.users.create(&request.email, &password_hash).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryUserStore, MockUserStore};
    use chrono::Utc;
    use tokio_test::assert_ok;
    use uuid::Uuid;

    fn jwt() -> JwtSecret {
        JwtSecret::new(Some("test-jwt-secret-min-32-chars!!!!".to_string()))
    }

    fn registration(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn seeded(secret: JwtSecret) -> (CredentialVerifier, Uuid) {
        let store = MemoryUserStore::new();
        let hash = PasswordService::hash_password("secret1").unwrap();
        let user = store.create("a@b.com", &hash).await.unwrap();
        let verifier = CredentialVerifier::new(
            Arc::new(store),
            PasswordService::new().unwrap(),
            secret,
        );
        (verifier, user.id)
    }

    #[tokio::test]
    async fn correct_password_issues_token_for_user() {
        let (verifier, user_id) = seeded(jwt()).await;
        let token = assert_ok!(verifier.login("a@b.com", "secret1").await);
        assert_eq!(jwt().validate(&token).unwrap().user_id, user_id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (verifier, _) = seeded(jwt()).await;
        let wrong = verifier.login("a@b.com", "wrong").await.unwrap_err();
        let unknown = verifier.login("nobody@x.com", "anything").await.unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn missing_secret_is_a_config_error_after_verification() {
        let (verifier, _) = seeded(JwtSecret::new(None)).await;
        let err = verifier.login("a@b.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        // Bad credentials are still reported as such.
        let err = verifier.login("a@b.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_email_still_runs_a_verification() {
        let mut store = MockUserStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        let passwords = PasswordService::new().unwrap();
        let verifier = CredentialVerifier::new(Arc::new(store), passwords.clone(), jwt());

        let err = verifier.login("nobody@x.com", "anything").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(passwords.dummy_verifications(), 1);
    }

    #[tokio::test]
    async fn known_email_skips_the_dummy_verification() {
        let store = MemoryUserStore::new();
        let hash = PasswordService::hash_password("secret1").unwrap();
        store.create("a@b.com", &hash).await.unwrap();
        let passwords = PasswordService::new().unwrap();
        let verifier = CredentialVerifier::new(Arc::new(store), passwords.clone(), jwt());

        assert!(verifier.login("a@b.com", "wrong").await.is_err());
        assert!(verifier.login("a@b.com", "secret1").await.is_ok());
        assert_eq!(passwords.dummy_verifications(), 0);
    }

    #[tokio::test]
    async fn empty_fields_are_invalid_credentials() {
        let (verifier, _) = seeded(jwt()).await;
        assert!(matches!(
            verifier.login("a@b.com", "").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            verifier.login("", "anything").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(AppError::Db(sqlx::Error::PoolTimedOut)));
        let verifier =
            CredentialVerifier::new(Arc::new(store), PasswordService::new().unwrap(), jwt());

        let err = verifier.login("a@b.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::Db(_)));
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_not_invalid_credentials() {
        let mut store = MockUserStore::new();
        store.expect_find_by_email().returning(|email| {
            Ok(Some(UserRecord {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: "plaintext?".to_string(),
                created_at: Utc::now(),
            }))
        });
        let verifier =
            CredentialVerifier::new(Arc::new(store), PasswordService::new().unwrap(), jwt());

        let err = verifier.login("a@b.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn lookup_uses_exact_email() {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_email()
            .withf(|email| email == " A@b.com")
            .times(1)
            .returning(|_| Ok(None));
        let verifier =
            CredentialVerifier::new(Arc::new(store), PasswordService::new().unwrap(), jwt());

        let err = verifier.login(" A@b.com", "x").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn register_then_login() {
        let verifier = CredentialVerifier::new(
            Arc::new(MemoryUserStore::new()),
            PasswordService::new().unwrap(),
            jwt(),
        );
        let user = verifier
            .register(&registration("new@b.com", "password123"))
            .await
            .unwrap();
        let token = verifier.login("new@b.com", "password123").await.unwrap();
        assert_eq!(jwt().validate(&token).unwrap().user_id, user.id);
    }

    #[tokio::test]
    async fn register_validates_input() {
        let (verifier, _) = seeded(jwt()).await;
        assert!(matches!(
            verifier.register(&registration("not-an-email", "password123")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            verifier.register(&registration("c@d.com", "short")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            verifier.register(&registration("a@b.com", "password123")).await,
            Err(AppError::Validation(msg)) if msg == "Email already registered"
        ));
    }
}
