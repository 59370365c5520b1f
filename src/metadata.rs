//! Raw key-value metadata as returned by DSpace.
//!
//! `GET /items/{id}/metadata` answers with a JSON array of objects such as
//!
//! ```json
//! [
//!   {"key": "dc.title", "value": "Plasma data", "language": "en_US"},
//!   {"key": "dc.contributor.author", "value": "Smith, Jane", "language": null}
//! ]
//! ```
//!
//! Only `key` and `value` are kept. Order is significant: repeated keys
//! (several authors, several relations) keep the order the source sent.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One atomic fact about a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMetadataField {
    /// Qualified Dublin Core key, e.g. `dc.contributor.author`
    pub key: String,
    /// Field value, unmodified
    pub value: String,
}

impl RawMetadataField {
    /// Create a field from a key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parse a metadata response body, preserving order.
///
/// # Errors
///
/// Returns [`ImportError::Json`](crate::ImportError::Json) if `body` is not
/// an array of `{key, value}` objects.
pub fn parse_metadata(body: &str) -> Result<Vec<RawMetadataField>> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImportError;

    #[test]
    fn test_parse_keeps_order_and_ignores_extra_keys() {
        let body = r#"[
            {"key": "dc.creator", "value": "B", "language": null},
            {"key": "dc.title", "value": "T", "language": "en_US"},
            {"key": "dc.creator", "value": "A", "language": null}
        ]"#;
        let fields = parse_metadata(body).unwrap();
        assert_eq!(
            fields,
            vec![
                RawMetadataField::new("dc.creator", "B"),
                RawMetadataField::new("dc.title", "T"),
                RawMetadataField::new("dc.creator", "A"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_metadata("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_object_body() {
        let err = parse_metadata(r#"{"error": "nope"}"#).unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));
    }
}
