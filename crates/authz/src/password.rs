//! Password hashing and verification using bcrypt

use thiserror::Error;

/// bcrypt reads at most this many bytes of a password and ignores the rest.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Whether bcrypt would see every byte of `password`.
///
/// Longer inputs are truncated and NUL ends the input, so two different
/// passwords could verify against the same hash.
pub fn is_supported(password: &str) -> bool {
    password.len() <= MAX_PASSWORD_BYTES && !password.contains('\0')
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password longer than {MAX_PASSWORD_BYTES} bytes or containing NUL")]
    Unsupported,

    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("password worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Hashes and verifies passwords off the async executor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password using bcrypt
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if !is_supported(password) {
            return Err(PasswordError::Unsupported);
        }
        let password = password.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hash)
    }

    /// Verify a password against a stored hash
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if !is_supported(password) {
            return Err(PasswordError::Unsupported);
        }
        let password = password.to_owned();
        let hash = hash.to_owned();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(valid)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
