#![forbid(unsafe_code)]
//! # API Key Lifecycle
//!
//! Issues and verifies opaque API keys, delegating persistence to
//! caller-supplied [`KeyStore`] hooks.
//!
//! Keys are encoded as `{prefix}_{identifier}.{secret}` — by default
//! `oil_<32 hex chars>.<64 alphanumeric chars>` (~380 bits of secret
//! entropy) — hashed with Argon2id for storage, and presented back as
//! `Authorization: Bearer <key>`. The plaintext of a minted key is readable
//! exactly once; only the hash is ever persisted.
//!
//! ## Quick Start
//!
//! ```rust
//! use api_key_lifecycle::{ApiKeyManager, ApiKeyToken, AuthContext, KeyStore, StoredKey};
//! use std::collections::HashMap;
//!
//! #[derive(Clone)]
//! struct KeyRecord {
//!     label: Option<String>,
//!     hashed_secret: String,
//! }
//!
//! impl StoredKey for KeyRecord {
//!     fn hashed_secret(&self) -> &str {
//!         &self.hashed_secret
//!     }
//! }
//!
//! #[derive(Default)]
//! struct MemoryStore {
//!     rows: HashMap<String, KeyRecord>,
//! }
//!
//! impl KeyStore for MemoryStore {
//!     type Record = KeyRecord;
//!
//!     fn create(&mut self, token: ApiKeyToken) -> KeyRecord {
//!         let record = KeyRecord {
//!             label: token.label().map(String::from),
//!             hashed_secret: token.hashed_secret().to_string(),
//!         };
//!         self.rows.insert(token.identifier().to_string(), record.clone());
//!         record
//!     }
//!
//!     fn fetch(&self, identifier: &str) -> Option<KeyRecord> {
//!         self.rows.get(identifier).cloned()
//!     }
//! }
//!
//! # fn main() -> api_key_lifecycle::Result<()> {
//! let manager = ApiKeyManager::init_default();
//! let mut store = MemoryStore::default();
//!
//! // Mint and persist. The plaintext is readable exactly once — hand it to
//! // the user now or lose it.
//! let mut token = manager.mint(Some("CI_DEPLOY_KEY"))?;
//! let plaintext = token.full_key();
//! store.create(token);
//!
//! // Later: authenticate a request.
//! let mut ctx = AuthContext::new();
//! let header = format!("Bearer {}", plaintext.expose_secret());
//! manager.authenticate(Some(&header), &store, &mut ctx)?;
//! assert!(ctx.is_authenticated());
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure rendering
//!
//! Internal failures are typed ([`Error`]) and distinguish malformed keys,
//! foreign prefixes, missing records and mismatches for logging purposes.
//! At the transport boundary, call [`Error::public`] before rendering so all
//! of those collapse into one generic "api-key invalid." and nothing leaks
//! about which step rejected the credential.

mod codec;
mod config;
mod domain;
mod error;
mod extract;
mod generator;
mod hasher;
mod secure;
mod store;
mod validator;

pub use codec::{Decoded, KeyCodec};
pub use config::{
    ApiKeyConfig, Charset, HashConfig, KeyLocation, KeyPrefix, DEFAULT_HEADER_NAME,
    DEFAULT_HEADER_TYPE, DEFAULT_PREFIX, DEFAULT_SECRET_LENGTH,
};
pub use domain::{ApiKeyManager, ApiKeyToken};
pub use error::{ConfigError, Error, ErrorResponse, OperationError, Result};
pub use generator::SecretGenerator;
pub use hasher::KeyHasher;
pub use secure::SecureString;
pub use store::{AuthContext, KeyStore, StoredKey};
pub use validator::KeyValidator;
