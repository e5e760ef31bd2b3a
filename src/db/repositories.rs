//! PostgreSQL user repository.

use async_trait::async_trait;
use uuid::Uuid;

use super::{DbPool, UserStore};
use crate::error::{AppError, AppResult};
use crate::models::UserRecord;

pub async fn user_create(pool: &DbPool, email: &str, password_hash: &str) -> AppResult<UserRecord> {
    let row = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES ($1, $2)
        RETURNING id, email, password_hash, created_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(map_unique_email)?;
    Ok(row)
}

pub async fn user_find_by_email(pool: &DbPool, email: &str) -> AppResult<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRecord>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn user_get_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRecord>(
        "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Two concurrent registrations can both pass the existence check; the unique
/// index settles it.
fn map_unique_email(e: sqlx::Error) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            AppError::Validation("Email already registered".to_string())
        }
        _ => AppError::Db(e),
    }
}

/// [`UserStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        user_find_by_email(&self.pool, email).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        user_get_by_id(&self.pool, id).await
    }

    async fn create(&self, email: &str, password_hash: &str) -> AppResult<UserRecord> {
        user_create(&self.pool, email, password_hash).await
    }
}
