use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::HashConfig;
use crate::error::{OperationError, Result};
use crate::secure::SecureString;

/// Argon2id hashing of full keys for at-rest storage.
///
/// The output is a self-describing PHC string (`$argon2id$v=19$m=...`): salt
/// and cost parameters travel inside it, so verification later needs nothing
/// but the string itself. Hashes are not secrets and are returned as plain
/// `String`.
#[derive(Debug, Clone)]
pub struct KeyHasher {
    config: HashConfig,
}

impl KeyHasher {
    pub fn new(config: HashConfig) -> Self {
        Self { config }
    }

    /// Hashes a full key under a fresh random 32-byte salt.
    ///
    /// Hashing the same key twice produces different strings; that is the
    /// point of per-hash salting.
    pub fn hash(&self, full_key: &SecureString) -> Result<String> {
        let mut salt_bytes = [0u8; 32];
        getrandom::fill(&mut salt_bytes)
            .map_err(|e| OperationError::Hashing(format!("Failed to generate salt: {}", e)))?;

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| OperationError::Hashing(e.to_string()))?;

        let params = Params::new(
            *self.config.memory_cost(),
            *self.config.time_cost(),
            *self.config.parallelism(),
            None,
        )
        .map_err(|e| OperationError::Hashing(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let hash = argon2
            .hash_password(full_key.expose_secret().as_bytes(), &salt)
            .map_err(|e| OperationError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }
}
