//! Password hashing. bcrypt is CPU-bound, so work runs on the blocking pool.

use crate::error::AppError;
use async_trait::async_trait;

pub const DEFAULT_COST: u32 = 10;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plain: &str) -> Result<String, AppError>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a valid bcrypt hash.
    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, AppError>;
}

#[derive(Clone, Copy, Debug)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        BcryptHasher { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        BcryptHasher::new(DEFAULT_COST)
    }
}

async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("bcrypt: {}", e)))
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, plain: &str) -> Result<String, AppError> {
        let plain = plain.to_owned();
        let cost = self.cost;
        blocking(move || bcrypt::hash(plain, cost)).await
    }

    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, AppError> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        blocking(move || bcrypt::verify(plain, &hash)).await
    }
}
