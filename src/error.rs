//! Error types for import operations.
//!
//! This module provides the [`ImportError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all import operations.
///
/// The first four variants are the outcomes a caller is expected to act on:
/// a single-record lookup surfaces them as-is, while a collection import
/// skips members that are [`NotFound`](Self::NotFound) or
/// [`Unavailable`](Self::Unavailable).
#[derive(Error, Debug)]
pub enum ImportError {
    /// The source service reports that the identifier does not exist.
    #[error("ID #{id} not found")]
    NotFound {
        /// Identifier that was looked up
        id: String,
    },

    /// The record exists but access to it is restricted.
    #[error("ID #{id} is not available")]
    Unavailable {
        /// Identifier that was looked up
        id: String,
    },

    /// Any other non-success response from the source service.
    #[error("ID #{id} unknown error code #{status}")]
    ServiceError {
        /// Identifier that was looked up
        id: String,
        /// Raw HTTP status returned by the service
        status: u16,
    },

    /// A `dc.date.issued` value matched none of the accepted date layouts.
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// Lookups require a non-empty identifier.
    #[error("Identifier must not be empty")]
    InvalidIdentifier,

    /// The request never produced a response (connection, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body was not the JSON shape the source promises.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Translated records could not be rendered as XML.
    #[error("XML error: {0}")]
    Xml(String),
}

impl ImportError {
    /// Whether a collection import should skip the member and keep going.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Unavailable { .. })
    }
}

/// Convenience type alias for [`std::result::Result`] with [`ImportError`].
pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_identifier() {
        let err = ImportError::NotFound {
            id: "88435".to_string(),
        };
        assert_eq!(err.to_string(), "ID #88435 not found");

        let err = ImportError::ServiceError {
            id: "88435".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "ID #88435 unknown error code #503");
    }

    #[test]
    fn test_only_lookup_misses_are_skippable() {
        assert!(ImportError::NotFound { id: "1".into() }.is_skippable());
        assert!(ImportError::Unavailable { id: "1".into() }.is_skippable());
        assert!(!ImportError::ServiceError {
            id: "1".into(),
            status: 500
        }
        .is_skippable());
        assert!(!ImportError::InvalidDateFormat("x".into()).is_skippable());
    }
}
