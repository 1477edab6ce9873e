use crate::config::{ApiKeyConfig, KeyLocation};
use crate::error::{Error, Result};

/// Pulls the unverified full key out of the transport carrier.
///
/// Only the header location is implemented: the value must be exactly two
/// whitespace-separated parts, `"{header_type} {full_key}"`. Zero parts and
/// more than two parts are rejected here, before any decoding is attempted.
pub(crate) fn extract_key<'a>(
    config: &ApiKeyConfig,
    header_value: Option<&'a str>,
) -> Result<&'a str> {
    match config.location() {
        KeyLocation::Header => {}
        other => {
            return Err(Error::LocationNotImplemented {
                location: other.to_string(),
            })
        }
    }

    let value = header_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::MissingAuthHeader {
            header_name: config.header_name().clone(),
        })?;

    let mut parts = value.split_whitespace();
    // A trimmed non-empty value always yields a first part.
    let scheme = parts.next().unwrap_or_default();
    if scheme != config.header_type().as_str() {
        return Err(Error::WrongHeaderScheme {
            header_name: config.header_name().clone(),
            header_type: config.header_type().clone(),
        });
    }

    let key = parts.next().ok_or_else(|| Error::MissingKeyPart {
        header_name: config.header_name().clone(),
        header_type: config.header_type().clone(),
    })?;

    if parts.next().is_some() {
        return Err(Error::ExcessHeaderParts {
            header_name: config.header_name().clone(),
            header_type: config.header_type().clone(),
        });
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ApiKeyConfig {
        ApiKeyConfig::default()
    }

    #[test]
    fn test_happy_path() {
        let key = extract_key(&config(), Some("Bearer oil_abc.def")).unwrap();
        assert_eq!(key, "oil_abc.def");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            extract_key(&config(), None).unwrap_err(),
            Error::MissingAuthHeader { .. }
        ));
        // Blank value is treated the same as absent
        assert!(matches!(
            extract_key(&config(), Some("   ")).unwrap_err(),
            Error::MissingAuthHeader { .. }
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        assert!(matches!(
            extract_key(&config(), Some("Basic oil_abc.def")).unwrap_err(),
            Error::WrongHeaderScheme { .. }
        ));
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert!(matches!(
            extract_key(&config(), Some("bearer oil_abc.def")).unwrap_err(),
            Error::WrongHeaderScheme { .. }
        ));
    }

    #[test]
    fn test_missing_key_part() {
        assert!(matches!(
            extract_key(&config(), Some("Bearer")).unwrap_err(),
            Error::MissingKeyPart { .. }
        ));
    }

    #[test]
    fn test_excess_parts() {
        assert!(matches!(
            extract_key(&config(), Some("Bearer oil_abc.def extra")).unwrap_err(),
            Error::ExcessHeaderParts { .. }
        ));
    }

    #[test]
    fn test_custom_scheme_and_header() {
        let config = ApiKeyConfig::new()
            .with_header_name("X-Api-Key")
            .with_header_type("Token");
        assert_eq!(
            extract_key(&config, Some("Token oil_abc.def")).unwrap(),
            "oil_abc.def"
        );
        let err = extract_key(&config, None).unwrap_err();
        assert_eq!(err.to_string(), "Missing X-Api-Key header.");
    }

    #[test]
    fn test_unimplemented_location_fails_fast() {
        let config = ApiKeyConfig::new().with_location(KeyLocation::Query);
        let err = extract_key(&config, Some("Bearer oil_abc.def")).unwrap_err();
        assert_eq!(
            err,
            Error::LocationNotImplemented {
                location: "query".to_string()
            }
        );
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_interior_whitespace_counts_as_excess() {
        assert!(matches!(
            extract_key(&config(), Some("Bearer oil_abc .def")).unwrap_err(),
            Error::ExcessHeaderParts { .. }
        ));
    }
}
