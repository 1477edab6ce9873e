use std::num::NonZeroUsize;

use rand::rngs::OsRng;
use rand::Rng;
use uuid::Uuid;

use crate::config::Charset;
use crate::secure::SecureString;

/// Uniform random string generation from the OS CSPRNG.
///
/// Stateless; both operations draw directly from `OsRng` so repeated calls
/// are independent and no generator state needs protecting.
pub struct SecretGenerator;

impl SecretGenerator {
    /// Produces exactly `length` characters, each drawn independently and
    /// uniformly from `charset`.
    ///
    /// Empty charsets are unrepresentable: [`Charset`] construction already
    /// rejected them, so sampling can index without a runtime guard.
    pub fn generate(length: NonZeroUsize, charset: &Charset) -> SecureString {
        let symbols = charset.chars();
        let mut rng = OsRng;
        let mut secret = String::with_capacity(length.get());
        for _ in 0..length.get() {
            secret.push(symbols[rng.gen_range(0..symbols.len())]);
        }
        SecureString::new(secret)
    }

    /// Fresh 128-bit random identifier, rendered as 32 lowercase hex chars.
    ///
    /// The identifier is the store's lookup key; 128 bits makes collisions
    /// negligible, and the hex alphabet keeps it clear of the wire-form
    /// separators.
    pub fn identifier() -> String {
        Uuid::new_v4().as_simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn len(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_exact_length_and_membership() {
        let charset = Charset::new("abc123").unwrap();
        for n in [1, 8, 64, 256] {
            let secret = SecretGenerator::generate(len(n), &charset);
            assert_eq!(secret.len(), n);
            assert!(secret.expose_secret().chars().all(|c| charset.contains(c)));
        }
    }

    #[test]
    fn test_calls_are_independent() {
        let charset = Charset::alphanumeric();
        let a = SecretGenerator::generate(len(32), &charset);
        let b = SecretGenerator::generate(len(32), &charset);
        assert_ne!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn test_distribution_is_roughly_uniform() {
        // 10k draws from a 2-symbol set: expectation 5000, stddev 50. A
        // +/-500 window is 10 sigma, loose enough to never flake while still
        // catching a broken sampler.
        let charset = Charset::new("ab").unwrap();
        let secret = SecretGenerator::generate(len(10_000), &charset);
        let count_a = secret.expose_secret().chars().filter(|&c| c == 'a').count();
        assert!(
            (4_500..=5_500).contains(&count_a),
            "skewed sample: {count_a} of 10000"
        );
    }

    #[test]
    fn test_every_symbol_is_reachable() {
        let charset = Charset::new("xyz").unwrap();
        let secret = SecretGenerator::generate(len(1_000), &charset);
        let seen: HashSet<char> = secret.expose_secret().chars().collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_identifier_is_32_hex_chars() {
        let id = SecretGenerator::identifier();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_identifiers_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            assert!(seen.insert(SecretGenerator::identifier()));
        }
    }
}
