use serde::Serialize;
use thiserror::Error;

/// Authentication failures raised by the key lifecycle.
///
/// Every variant carries a `title()`, a `message()` (the `Display` output)
/// and an HTTP-style `status_code()`. The internal taxonomy is deliberately
/// richer than what end users see: call [`Error::public`] at the transport
/// boundary to collapse the key-existence-revealing variants into the one
/// generic [`Error::InvalidApiKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("api-key location {location} not yet implemented.")]
    LocationNotImplemented { location: String },

    #[error("Missing {header_name} header.")]
    MissingAuthHeader { header_name: String },

    #[error("{header_name} header must start with {header_type}.")]
    WrongHeaderScheme {
        header_name: String,
        header_type: String,
    },

    #[error("Missing api-key. Expected \"{header_name}: {header_type} <API-KEY>\".")]
    MissingKeyPart {
        header_name: String,
        header_type: String,
    },

    #[error("Malformed header. Expected \"{header_name}: {header_type} <API-KEY>\".")]
    ExcessHeaderParts {
        header_name: String,
        header_type: String,
    },

    /// The presented key does not split into prefix, identifier and secret.
    #[error("Cannot parse this api-key. Is this even an api-key?")]
    MalformedKey,

    /// Well-shaped key carrying somebody else's prefix.
    #[error("This does not look like one of our api-keys.")]
    PrefixMismatch,

    /// The store's fetch returned nothing for the presented identifier.
    #[error("api-key record not found.")]
    KeyNotFound,

    /// Generic rejection shown to end users regardless of the real cause.
    #[error("api-key invalid.")]
    InvalidApiKey,

    /// Internal failure (generation, hashing, verification).
    ///
    /// Display stays generic; the detail is reachable through `{:?}` and
    /// `source()` for logging.
    #[error("Operation failed")]
    Operation(
        #[source]
        #[from]
        OperationError,
    ),
}

impl Error {
    /// Short name of the failure, used as the `title` of the rendered body.
    pub fn title(&self) -> &'static str {
        match self {
            Error::LocationNotImplemented { .. } => "LocationNotImplemented",
            Error::MissingAuthHeader { .. } => "MissingAuthHeader",
            Error::WrongHeaderScheme { .. } => "WrongHeaderScheme",
            Error::MissingKeyPart { .. } => "MissingKeyPart",
            Error::ExcessHeaderParts { .. } => "ExcessHeaderParts",
            Error::MalformedKey => "MalformedKey",
            Error::PrefixMismatch => "PrefixMismatch",
            Error::KeyNotFound => "KeyNotFound",
            Error::InvalidApiKey => "InvalidApiKey",
            Error::Operation(_) => "OperationFailed",
        }
    }

    /// HTTP-style status of the failure.
    ///
    /// Token-shape errors are 502-class: they mean our own expectation about
    /// the credential was violated, which points at an integration bug or a
    /// foreign token rather than a bad end user.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingAuthHeader { .. }
            | Error::WrongHeaderScheme { .. }
            | Error::MissingKeyPart { .. }
            | Error::ExcessHeaderParts { .. }
            | Error::InvalidApiKey => 401,
            Error::KeyNotFound => 404,
            Error::LocationNotImplemented { .. }
            | Error::MalformedKey
            | Error::PrefixMismatch => 502,
            Error::Operation(_) => 500,
        }
    }

    /// Collapses the variants that would reveal whether a key exists, is
    /// ours, or merely failed the hash check into the single generic
    /// [`Error::InvalidApiKey`]. Transport-shape and configuration errors
    /// pass through unchanged.
    pub fn public(&self) -> Error {
        match self {
            Error::MalformedKey
            | Error::PrefixMismatch
            | Error::KeyNotFound
            | Error::InvalidApiKey => Error::InvalidApiKey,
            other => other.clone(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            title: self.title().to_string(),
            message: self.to_string(),
            status_code: self.status_code(),
        }
    }
}

/// Configuration errors with specific variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Prefix must be between 1 and 20 characters")]
    InvalidPrefixLength,

    #[error("Prefix must contain only ASCII alphanumeric characters")]
    InvalidPrefixCharacters,

    #[error("Charset must not be empty")]
    EmptyCharset,

    #[error("Charset must not contain '_', '.' or whitespace")]
    SeparatorInCharset,

    #[error("Charset must not contain duplicate characters")]
    DuplicateInCharset,

    #[error("Charset must contain only printable ASCII characters")]
    NonAsciiCharset,

    #[error("Secret length must be at least 1 character")]
    ZeroSecretLength,

    #[error("Secret length cannot exceed 256 characters")]
    SecretLengthTooLong,

    #[error("Invalid Argon2 parameters")]
    InvalidHashParams,
}

/// Detailed operation errors for debugging (use `{:?}` to see these).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("Key generation failed: {0}")]
    Generation(String),

    #[error("Hashing failed: {0}")]
    Hashing(String),

    #[error("Verification failed: {0}")]
    Verification(String),
}

/// Transport-neutral rendering of an [`Error`], serialized as the JSON body
/// `{"title": ..., "message": ..., "status_code": ...}` with the matching
/// HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub title: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn to_json(&self) -> String {
        // Plain struct of strings and an integer; serialization cannot fail.
        serde_json::to_string(self).expect("ErrorResponse serializes without error")
    }
}

pub type Result<T> = std::result::Result<T, Error>;
