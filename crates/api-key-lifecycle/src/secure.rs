//! Secure memory handling for key plaintext.

use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string wrapper for key material that zeroes its memory on drop.
///
/// Minted full keys and freshly generated secrets live in this type so the
/// plaintext does not linger in memory (core dumps, swap, debuggers) after
/// the value goes out of scope. The `zeroize` crate provides
/// compiler-fence-backed guarantees that the wipe is not optimized away.
///
/// Access to the inner value is explicit through [`SecureString::expose_secret`];
/// there is no `Deref` to `str`, so every read site is grep-able. `Debug` and
/// `Display` are redacted, which keeps the plaintext out of logs even when a
/// containing struct derives `Debug`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Wraps an owned `String`. The buffer is moved, so the original
    /// allocation is the one wiped on drop.
    pub fn new(inner: String) -> Self {
        Self(inner)
    }

    /// Grants read access to the protected value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Length of the protected value in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(inner: String) -> Self {
        Self::new(inner)
    }
}

// Comparison runs in constant time so equality checks on key material never
// become a timing oracle.
impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureString([REDACTED])")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose_secret() {
        let secret = SecureString::from("oil_abc.def".to_string());
        assert_eq!(secret.expose_secret(), "oil_abc.def");
        assert_eq!(secret.len(), 11);
        assert!(!secret.is_empty());
    }

    #[test]
    fn test_debug_and_display_are_redacted() {
        let secret = SecureString::from("sensitive_value".to_string());

        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "SecureString([REDACTED])");
        assert!(!debug_output.contains("sensitive_value"));

        let display_output = format!("{}", secret);
        assert_eq!(display_output, "[REDACTED]");
    }

    #[test]
    fn test_constant_time_equality() {
        let a = SecureString::from("same".to_string());
        let b = SecureString::from("same".to_string());
        let c = SecureString::from("different".to_string());
        assert!(a == b);
        assert!(a != c);
    }

    #[test]
    fn test_empty() {
        let empty = SecureString::from(String::new());
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }
}
