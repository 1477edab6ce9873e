use crate::config::KeyPrefix;
use crate::error::{Error, Result};

/// Inputs longer than this are rejected before any splitting; keys minted by
/// this crate are far below it (prefix <= 20, identifier 32, secret <= 256).
pub(crate) const MAX_KEY_LENGTH: usize = 512;

/// Identifier and secret of a presented key, borrowed from the input.
///
/// This is the parse-path counterpart of a minted token: no hash is computed
/// here, verification is delegated to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub identifier: &'a str,
    pub secret: &'a str,
}

/// Encodes and decodes the wire form `{prefix}_{identifier}.{secret}`.
///
/// Decoding relies on the configuration contract that neither the prefix,
/// the identifier alphabet (hex) nor the secret charset contains `_` or `.`;
/// [`KeyPrefix`] and [`crate::Charset`] enforce that at construction.
#[derive(Debug, Clone)]
pub struct KeyCodec {
    prefix: KeyPrefix,
}

impl KeyCodec {
    pub fn new(prefix: KeyPrefix) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    pub fn encode(&self, identifier: &str, secret: &str) -> String {
        format!("{}_{}.{}", self.prefix.as_str(), identifier, secret)
    }

    /// Two-stage check: shape first, then prefix.
    ///
    /// The `_` separator is treated as equivalent to `.`, so the input must
    /// fall apart into exactly three separator-free segments. A wrong part
    /// count is [`Error::MalformedKey`] (garbage input); a correct shape
    /// under a foreign prefix is [`Error::PrefixMismatch`] (not one of
    /// ours). Callers can log the two differently while rendering the same
    /// generic rejection to the end user.
    pub fn decode<'a>(&self, full_key: &'a str) -> Result<Decoded<'a>> {
        if full_key.len() > MAX_KEY_LENGTH {
            return Err(Error::MalformedKey);
        }

        let parts: Vec<&str> = full_key.split(['_', '.']).collect();
        if parts.len() != 3 {
            return Err(Error::MalformedKey);
        }
        if parts[0] != self.prefix.as_str() {
            return Err(Error::PrefixMismatch);
        }

        Ok(Decoded {
            identifier: parts[1],
            secret: parts[2],
        })
    }
}
