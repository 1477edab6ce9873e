use std::collections::HashSet;
use std::num::NonZeroUsize;

use derive_getters::Getters;
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::ConfigError;

pub const DEFAULT_HEADER_NAME: &str = "Authorization";
pub const DEFAULT_HEADER_TYPE: &str = "Bearer";
pub const DEFAULT_PREFIX: &str = "oil";
pub const DEFAULT_SECRET_LENGTH: usize = 64;

/// Mixed-case letters plus digits, ~5.95 bits of entropy per character.
const ALPHANUMERIC_62: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Secrets below this budget get a startup warning (not an error).
const MIN_SECRET_ENTROPY_BITS: f64 = 128.0;

/// Where the presented credential is carried on the request.
///
/// Only `Header` is implemented; the other recognized locations fail fast at
/// extraction time with `LocationNotImplemented`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum KeyLocation {
    #[default]
    #[strum(serialize = "header")]
    Header,
    #[strum(serialize = "query")]
    Query,
    #[strum(serialize = "cookie")]
    Cookie,
}

/// Namespace tag at the front of every issued key.
///
/// Restricted to ASCII alphanumerics so the prefix can never collide with
/// the `_` and `.` separators of the wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    pub fn new(prefix: impl Into<String>) -> std::result::Result<Self, ConfigError> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.len() > 20 {
            return Err(ConfigError::InvalidPrefixLength);
        }
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidPrefixCharacters);
        }
        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated set of characters secrets are drawn from.
///
/// Construction enforces the codec's charset contract once, so decoding can
/// rely on it without per-call checks: no `_`, no `.`, no whitespace, no
/// duplicates (duplicates would skew the per-character distribution).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset(Vec<char>);

impl Charset {
    pub fn new(chars: impl AsRef<str>) -> std::result::Result<Self, ConfigError> {
        let chars = chars.as_ref();
        if chars.is_empty() {
            return Err(ConfigError::EmptyCharset);
        }
        let mut seen = HashSet::new();
        for c in chars.chars() {
            if !c.is_ascii_graphic() {
                return Err(ConfigError::NonAsciiCharset);
            }
            if c == '_' || c == '.' {
                return Err(ConfigError::SeparatorInCharset);
            }
            if !seen.insert(c) {
                return Err(ConfigError::DuplicateInCharset);
            }
        }
        Ok(Self(chars.chars().collect()))
    }

    /// The default 62-character alphanumeric set.
    pub fn alphanumeric() -> Self {
        Self(ALPHANUMERIC_62.chars().collect())
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    /// Entropy contributed by one character drawn from this set.
    pub fn bits_per_char(&self) -> f64 {
        (self.0.len() as f64).log2()
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::alphanumeric()
    }
}

/// Argon2id cost parameters for at-rest hashing.
#[derive(Debug, Clone, Getters)]
pub struct HashConfig {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl HashConfig {
    /// Custom parameters, validated against what the Argon2 library accepts.
    pub fn custom(
        memory_cost: u32,
        time_cost: u32,
        parallelism: u32,
    ) -> std::result::Result<Self, ConfigError> {
        argon2::Params::new(memory_cost, time_cost, parallelism, None)
            .map_err(|_| ConfigError::InvalidHashParams)?;

        Ok(Self {
            memory_cost,
            time_cost,
            parallelism,
        })
    }

    /// Balanced preset for general production use (46 MB, 1 iteration,
    /// 1 thread), per the OWASP Argon2id recommendation.
    pub fn balanced() -> Self {
        Self {
            memory_cost: 47_104,
            time_cost: 1,
            parallelism: 1,
        }
    }

    /// High security preset (64 MB, 2 iterations, 4 threads).
    pub fn high_security() -> Self {
        Self {
            memory_cost: 65_536,
            time_cost: 2,
            parallelism: 4,
        }
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Full configuration surface of the key lifecycle.
///
/// Built with `with_*` methods; the validating ones return
/// `Result<Self, ConfigError>`, so a constructed config is always internally
/// consistent.
#[derive(Debug, Clone, Getters)]
pub struct ApiKeyConfig {
    location: KeyLocation,
    header_name: String,
    header_type: String,
    prefix: KeyPrefix,
    secret_length: NonZeroUsize,
    secret_charset: Charset,
    hash: HashConfig,
}

impl ApiKeyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: KeyLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    pub fn with_header_type(mut self, scheme: impl Into<String>) -> Self {
        self.header_type = scheme.into();
        self
    }

    pub fn with_prefix(
        mut self,
        prefix: impl Into<String>,
    ) -> std::result::Result<Self, ConfigError> {
        self.prefix = KeyPrefix::new(prefix)?;
        Ok(self)
    }

    /// Number of secret characters per key. Capped at 256 so every encoded
    /// key stays under the decoder's input-size limit.
    pub fn with_secret_length(
        mut self,
        length: usize,
    ) -> std::result::Result<Self, ConfigError> {
        if length > 256 {
            return Err(ConfigError::SecretLengthTooLong);
        }
        self.secret_length = NonZeroUsize::new(length).ok_or(ConfigError::ZeroSecretLength)?;
        Ok(self)
    }

    pub fn with_charset(
        mut self,
        chars: impl AsRef<str>,
    ) -> std::result::Result<Self, ConfigError> {
        self.secret_charset = Charset::new(chars)?;
        Ok(self)
    }

    pub fn with_hash(mut self, hash: HashConfig) -> Self {
        self.hash = hash;
        self
    }

    /// Entropy budget of secrets minted under this configuration.
    pub fn secret_entropy_bits(&self) -> f64 {
        self.secret_length.get() as f64 * self.secret_charset.bits_per_char()
    }

    pub(crate) fn entropy_below_floor(&self) -> bool {
        self.secret_entropy_bits() < MIN_SECRET_ENTROPY_BITS
    }
}

impl Default for ApiKeyConfig {
    fn default() -> Self {
        Self {
            location: KeyLocation::Header,
            header_name: DEFAULT_HEADER_NAME.to_string(),
            header_type: DEFAULT_HEADER_TYPE.to_string(),
            prefix: KeyPrefix(DEFAULT_PREFIX.to_string()),
            secret_length: NonZeroUsize::new(DEFAULT_SECRET_LENGTH)
                .expect("default secret length is non-zero"),
            secret_charset: Charset::alphanumeric(),
            hash: HashConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_prefix_validation() {
        assert!(KeyPrefix::new("oil").is_ok());
        assert!(KeyPrefix::new("svc2").is_ok());
        assert!(KeyPrefix::new("").is_err());
        assert!(KeyPrefix::new("a".repeat(21)).is_err());
        // Separator characters can never appear in a prefix
        assert!(KeyPrefix::new("api_key").is_err());
        assert!(KeyPrefix::new("api.key").is_err());
        assert!(KeyPrefix::new("api-key").is_err());
    }

    #[test]
    fn test_charset_validation() {
        assert!(Charset::new("ab").is_ok());
        assert!(Charset::new("0123456789abcdef").is_ok());
        assert_eq!(Charset::new(""), Err(ConfigError::EmptyCharset));
        assert_eq!(Charset::new("ab_c"), Err(ConfigError::SeparatorInCharset));
        assert_eq!(Charset::new("ab.c"), Err(ConfigError::SeparatorInCharset));
        assert_eq!(Charset::new("ab c"), Err(ConfigError::NonAsciiCharset));
        assert_eq!(Charset::new("abcb"), Err(ConfigError::DuplicateInCharset));
        assert_eq!(Charset::new("abcé"), Err(ConfigError::NonAsciiCharset));
    }

    #[test]
    fn test_default_charset_is_62_alphanumerics() {
        let charset = Charset::alphanumeric();
        assert_eq!(charset.len(), 62);
        assert!(charset.chars().iter().all(|c| c.is_ascii_alphanumeric()));
        assert!((charset.bits_per_char() - 5.95).abs() < 0.01);
    }

    #[test]
    fn test_defaults_table() {
        let config = ApiKeyConfig::default();
        assert_eq!(*config.location(), KeyLocation::Header);
        assert_eq!(config.header_name(), "Authorization");
        assert_eq!(config.header_type(), "Bearer");
        assert_eq!(config.prefix().as_str(), "oil");
        assert_eq!(config.secret_length().get(), 64);
        assert_eq!(config.secret_charset().len(), 62);
    }

    #[test]
    fn test_secret_length_bounds() {
        assert!(ApiKeyConfig::new().with_secret_length(8).is_ok());
        assert!(ApiKeyConfig::new().with_secret_length(256).is_ok());
        assert_eq!(
            ApiKeyConfig::new().with_secret_length(0).unwrap_err(),
            ConfigError::ZeroSecretLength
        );
        assert_eq!(
            ApiKeyConfig::new().with_secret_length(257).unwrap_err(),
            ConfigError::SecretLengthTooLong
        );
    }

    #[test]
    fn test_entropy_budget() {
        let config = ApiKeyConfig::default();
        // 64 chars over 62 symbols ~= 380 bits
        assert!(config.secret_entropy_bits() > 380.0);
        assert!(!config.entropy_below_floor());

        let weak = ApiKeyConfig::new()
            .with_secret_length(8)
            .unwrap()
            .with_charset("ab")
            .unwrap();
        assert!(weak.entropy_below_floor());
    }

    #[test]
    fn test_location_parses_case_insensitively() {
        assert_eq!(KeyLocation::from_str("header").unwrap(), KeyLocation::Header);
        assert_eq!(KeyLocation::from_str("Header").unwrap(), KeyLocation::Header);
        assert_eq!(KeyLocation::from_str("QUERY").unwrap(), KeyLocation::Query);
        assert!(KeyLocation::from_str("body").is_err());
    }

    #[test]
    fn test_hash_config_presets() {
        let balanced = HashConfig::balanced();
        let high = HashConfig::high_security();
        assert!(high.memory_cost() > balanced.memory_cost());
        assert!(HashConfig::custom(8192, 1, 1).is_ok());
        assert!(HashConfig::custom(0, 0, 0).is_err());
    }
}
