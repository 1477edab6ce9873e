use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use lazy_static::lazy_static;
use password_hash::PasswordHashString;

use crate::codec::MAX_KEY_LENGTH;
use crate::error::{Error, OperationError, Result};

/// Maximum allowed length for stored hashes (prevents DoS via malformed hashes).
const MAX_HASH_LENGTH: usize = 512;

/// Syntactically valid Argon2id hash that matches no real key. Verifying
/// against it on error paths keeps their timing in line with a genuine
/// mismatch.
const DUMMY_HASH_PHC: &str =
    "$argon2id$v=19$m=47104,t=1,p=1$c2FsdHNhbHRzYWx0c2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

const DUMMY_KEY: &str = "oil_00000000000000000000000000000000.notarealsecret";

lazy_static! {
    static ref DUMMY_HASH: PasswordHashString =
        PasswordHashString::new(DUMMY_HASH_PHC).expect("dummy hash literal is a valid PHC string");
}

/// Constant-attention verification of a presented key against a stored hash.
///
/// All comparison happens inside Argon2's own verify routine; this module
/// never compares raw bytes or re-derived hash strings.
pub struct KeyValidator;

impl KeyValidator {
    /// Returns whether `presented` matches `stored_hash`.
    ///
    /// An unparseable stored hash performs a dummy verification and reports
    /// `Ok(false)` rather than an error, so a caller timing or reading the
    /// result cannot distinguish "record holds garbage" from "wrong key".
    /// Oversized inputs are the exception: they are rejected with an error
    /// before any hashing, after the same dummy work.
    pub fn verify(presented: &str, stored_hash: &str) -> Result<bool> {
        if presented.len() > MAX_KEY_LENGTH {
            Self::dummy_load();
            return Err(Error::MalformedKey);
        }
        if stored_hash.len() > MAX_HASH_LENGTH {
            Self::dummy_load();
            return Err(OperationError::Verification(
                "stored hash exceeds maximum length".to_string(),
            )
            .into());
        }

        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(h) => h,
            Err(_) => {
                Self::dummy_load();
                return Ok(false);
            }
        };

        Ok(Argon2::default()
            .verify_password(presented.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn dummy_load() {
        let _ = Argon2::default().verify_password(DUMMY_KEY.as_bytes(), &DUMMY_HASH.password_hash());
    }
}
