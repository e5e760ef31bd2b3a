//! Password hashing and verification (argon2).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use uuid::Uuid;

/// Hashes and verifies passwords.
///
/// Holds a hash of a random throwaway password so that a login for an unknown
/// email can spend the same work as a real verification. Clones share the
/// throwaway hash and its counter.
#[derive(Clone)]
pub struct PasswordService {
    dummy_hash: Arc<str>,
    dummy_runs: Arc<AtomicU64>,
}

impl PasswordService {
    pub fn new() -> AppResult<Self> {
        let dummy_hash = Self::hash_password(&Uuid::new_v4().to_string())?;
        Ok(Self {
            dummy_hash: dummy_hash.into(),
            dummy_runs: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Argon2id with default parameters and a fresh salt, as a PHC string.
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let stored = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &stored)
            .is_ok())
    }

    /// Verify against the throwaway hash and discard the result.
    pub fn verify_dummy(&self, password: &str) {
        let _ = Self::verify_password(password, &self.dummy_hash);
        self.dummy_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of throwaway verifications run so far.
    pub fn dummy_verifications(&self) -> u64 {
        self.dummy_runs.load(Ordering::Relaxed)
    }
}
