//! Storage interface consumed by the credential verifier.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::UserRecord;

/// Lookup and creation of user records.
///
/// Email matching is exact and case-sensitive. Implementations own their
/// concurrency; callers share one instance behind an `Arc`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the single user with exactly this email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Validation`] if the email is already registered.
    async fn create(&self, email: &str, password_hash: &str) -> AppResult<UserRecord>;
}
