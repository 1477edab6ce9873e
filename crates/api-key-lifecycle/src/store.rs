use crate::domain::ApiKeyToken;
use crate::error::{Error, ErrorResponse, Result};
use crate::validator::KeyValidator;

/// A persisted key record that can surface its stored hash.
///
/// The hash is the only key-derived value ever persisted, so every record
/// shape the default verification can work with must expose it. A bare PHC
/// `String` qualifies (see the blanket impl below) for stores that keep
/// nothing else.
pub trait StoredKey {
    fn hashed_secret(&self) -> &str;
}

impl StoredKey for String {
    fn hashed_secret(&self) -> &str {
        self
    }
}

/// Caller-supplied persistence and policy hooks.
///
/// `create` and `fetch` are required; `verify` and `handle_error` have
/// default implementations (hash comparison through [`KeyValidator`] and the
/// JSON error body). Overriding `verify` is the seam for substituting the
/// hashing scheme or layering extra checks such as revocation.
///
/// The lifecycle never catches panics or errors raised inside these methods;
/// they propagate to the caller as-is.
pub trait KeyStore {
    type Record: StoredKey;

    /// Persist a freshly minted token (label, identifier and hashed secret).
    ///
    /// This is the one place the plaintext can still be read, exactly once,
    /// via [`ApiKeyToken::full_key`] — typically to hand it to the end user.
    /// The returned record becomes the output of
    /// [`crate::ApiKeyManager::create`], so stores are free to return their
    /// own richer persisted shape.
    fn create(&mut self, token: ApiKeyToken) -> Self::Record;

    /// Look up a record by identifier. `None` means "not found" and is not
    /// an error.
    fn fetch(&self, identifier: &str) -> Option<Self::Record>;

    /// Decide whether the presented full key matches the record.
    fn verify(&self, presented: &str, record: &Self::Record) -> Result<bool> {
        KeyValidator::verify(presented, record.hashed_secret())
    }

    /// Render a failure as a transport-level response body.
    fn handle_error(&self, error: &Error) -> ErrorResponse {
        error.to_response()
    }
}

/// Explicit request-scoped slot for the verified key record.
///
/// One context accompanies one in-flight request; the slot is filled at most
/// once, on successful verification, and the whole context is dropped with
/// the request. Threading it through the call chain replaces the ambient
/// per-request global the lifecycle would otherwise need.
#[derive(Debug)]
pub struct AuthContext<R> {
    record: Option<R>,
}

impl<R> AuthContext<R> {
    pub fn new() -> Self {
        Self { record: None }
    }

    pub(crate) fn attach(&mut self, record: R) {
        debug_assert!(self.record.is_none(), "request slot filled twice");
        self.record = Some(record);
    }

    /// The record attached by a successful verification, if any.
    pub fn record(&self) -> Option<&R> {
        self.record.as_ref()
    }

    /// Moves the record out, leaving the context unauthenticated.
    pub fn take_record(&mut self) -> Option<R> {
        self.record.take()
    }

    pub fn is_authenticated(&self) -> bool {
        self.record.is_some()
    }
}

impl<R> Default for AuthContext<R> {
    fn default() -> Self {
        Self::new()
    }
}
