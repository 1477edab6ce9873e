use tracing::{debug, warn};

use crate::codec::KeyCodec;
use crate::config::ApiKeyConfig;
use crate::error::{Error, Result};
use crate::extract::extract_key;
use crate::generator::SecretGenerator;
use crate::hasher::KeyHasher;
use crate::secure::SecureString;
use crate::store::{AuthContext, KeyStore};

/// One minted API key.
///
/// Ephemeral: it exists to carry the pieces from minting to the store's
/// `create` hook and the plaintext to the end user, then falls out of scope.
/// Only `hashed_secret` is meant to be persisted; the encoded plaintext is
/// readable exactly once through [`ApiKeyToken::full_key`].
#[derive(Debug)]
pub struct ApiKeyToken {
    label: Option<String>,
    identifier: String,
    hashed_secret: String,
    full_key: Option<SecureString>,
}

impl ApiKeyToken {
    /// What a second read of the plaintext yields instead of the secret.
    pub const CONSUMED_SENTINEL: &'static str = "API_KEY_ALREADY_CONSUMED";

    fn new(
        label: Option<String>,
        identifier: String,
        hashed_secret: String,
        full_key: SecureString,
    ) -> Self {
        Self {
            label,
            identifier,
            hashed_secret,
            full_key: Some(full_key),
        }
    }

    /// Caller-supplied human identifier for the key.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The 32-hex-char lookup identifier. Immutable once generated.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The Argon2id PHC string of the full key — the only form to persist.
    pub fn hashed_secret(&self) -> &str {
        &self.hashed_secret
    }

    /// Takes the plaintext full key, at most once.
    ///
    /// The first call moves the real value out; the backing buffer is gone
    /// from the token and every later call returns the fixed
    /// [`ApiKeyToken::CONSUMED_SENTINEL`]. A plaintext that escaped the
    /// minting call site (logs, re-serialization, a second accidental read)
    /// can never be recovered from this object again.
    pub fn full_key(&mut self) -> SecureString {
        match self.full_key.take() {
            Some(key) => key,
            None => SecureString::new(Self::CONSUMED_SENTINEL.to_string()),
        }
    }

    pub fn consumed(&self) -> bool {
        self.full_key.is_none()
    }
}

/// Issues and verifies API keys against a caller-supplied [`KeyStore`].
///
/// Holds immutable configuration only — no key material, no storage. Safe to
/// clone and share; every operation runs to completion on the calling
/// thread, and concurrent requests are independent because each owns its
/// [`AuthContext`].
#[derive(Debug, Clone)]
pub struct ApiKeyManager {
    config: ApiKeyConfig,
    codec: KeyCodec,
    hasher: KeyHasher,
}

impl ApiKeyManager {
    pub fn init(config: ApiKeyConfig) -> Self {
        if config.entropy_below_floor() {
            warn!(
                entropy_bits = config.secret_entropy_bits(),
                "configured secret entropy is below 128 bits"
            );
        }
        let codec = KeyCodec::new(config.prefix().clone());
        let hasher = KeyHasher::new(config.hash().clone());
        Self {
            config,
            codec,
            hasher,
        }
    }

    pub fn init_default() -> Self {
        Self::init(ApiKeyConfig::default())
    }

    pub fn config(&self) -> &ApiKeyConfig {
        &self.config
    }

    /// Mints a new key: fresh identifier and secret, encoded and hashed.
    ///
    /// Persists nothing; apart from consuming randomness this has no effect
    /// on external state. Pair with [`KeyStore::create`] directly or through
    /// [`ApiKeyManager::create`].
    pub fn mint(&self, label: Option<&str>) -> Result<ApiKeyToken> {
        let identifier = SecretGenerator::identifier();
        let secret = SecretGenerator::generate(
            *self.config.secret_length(),
            self.config.secret_charset(),
        );
        let full_key = SecureString::new(self.codec.encode(&identifier, secret.expose_secret()));
        let hashed_secret = self.hasher.hash(&full_key)?;

        Ok(ApiKeyToken::new(
            label.map(String::from),
            identifier,
            hashed_secret,
            full_key,
        ))
    }

    /// Mints a key and hands it to the store.
    ///
    /// The store's own record shape comes back as the result, so callers get
    /// whatever their persistence layer produced.
    pub fn create<S: KeyStore>(&self, label: Option<&str>, store: &mut S) -> Result<S::Record> {
        let token = self.mint(label)?;
        Ok(store.create(token))
    }

    /// Verifies a presented full key against the store.
    ///
    /// One attempt walks Received → Decoded → Looked Up → Verified, or stops
    /// at the first failing step; nothing here retries. Decode failures
    /// propagate as [`Error::MalformedKey`] / [`Error::PrefixMismatch`], a
    /// missing record as [`Error::KeyNotFound`]. The verdict itself is the
    /// returned boolean, and a `true` verdict attaches the fetched record to
    /// `ctx` for the rest of the request.
    pub fn verify<S: KeyStore>(
        &self,
        presented: &str,
        store: &S,
        ctx: &mut AuthContext<S::Record>,
    ) -> Result<bool> {
        let decoded = self.codec.decode(presented).map_err(|e| {
            debug!(error = %e, "presented key failed decoding");
            e
        })?;

        let record = match store.fetch(decoded.identifier) {
            Some(record) => record,
            None => {
                debug!(identifier = decoded.identifier, "no record for identifier");
                return Err(Error::KeyNotFound);
            }
        };

        let valid = store.verify(presented, &record)?;
        if valid {
            ctx.attach(record);
        } else {
            debug!(identifier = decoded.identifier, "verification mismatch");
        }
        Ok(valid)
    }

    /// Full header-location authentication path.
    ///
    /// Extracts the credential from the header value, verifies it, and turns
    /// a `false` verdict into [`Error::InvalidApiKey`]. Render failures for
    /// the wire with `err.public().to_response()` (or the store's
    /// `handle_error`) so internal causes stay internal.
    pub fn authenticate<S: KeyStore>(
        &self,
        header_value: Option<&str>,
        store: &S,
        ctx: &mut AuthContext<S::Record>,
    ) -> Result<()> {
        let presented = extract_key(&self.config, header_value)?;
        if self.verify(presented, store, ctx)? {
            Ok(())
        } else {
            Err(Error::InvalidApiKey)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_populates_every_field() {
        let manager = ApiKeyManager::init_default();
        let token = manager.mint(Some("MY_NEW_KEY")).unwrap();

        assert_eq!(token.label(), Some("MY_NEW_KEY"));
        assert_eq!(token.identifier().len(), 32);
        assert!(token.hashed_secret().starts_with("$argon2id$"));
        assert!(!token.consumed());
    }

    #[test]
    fn test_unlabeled_mint() {
        let manager = ApiKeyManager::init_default();
        let token = manager.mint(None).unwrap();
        assert_eq!(token.label(), None);
    }

    #[test]
    fn test_full_key_reads_once() {
        let manager = ApiKeyManager::init_default();
        let mut token = manager.mint(Some("one-shot")).unwrap();

        let first = token.full_key();
        assert!(first
            .expose_secret()
            .starts_with(&format!("oil_{}.", token.identifier())));
        assert!(token.consumed());

        let second = token.full_key();
        assert_eq!(second.expose_secret(), ApiKeyToken::CONSUMED_SENTINEL);
        let third = token.full_key();
        assert_eq!(third.expose_secret(), ApiKeyToken::CONSUMED_SENTINEL);
    }

    #[test]
    fn test_minted_keys_are_unique() {
        let manager = ApiKeyManager::init_default();
        let mut a = manager.mint(Some("a")).unwrap();
        let mut b = manager.mint(Some("b")).unwrap();
        assert_ne!(a.identifier(), b.identifier());
        assert_ne!(a.hashed_secret(), b.hashed_secret());
        assert_ne!(
            a.full_key().expose_secret(),
            b.full_key().expose_secret()
        );
    }

    #[test]
    fn test_token_debug_never_shows_plaintext() {
        let manager = ApiKeyManager::init_default();
        let token = manager.mint(Some("dbg")).unwrap();
        let rendered = format!("{:?}", token);
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("oil_"));
    }
}
