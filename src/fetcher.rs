//! Single-record metadata lookup.
//!
//! [`RecordFetcher`] performs exactly one `GET /items/{id}/metadata` per call
//! and maps the status onto [`ImportError`]:
//!
//! | status | outcome |
//! |---|---|
//! | 200 | `Ok(fields)` in source order |
//! | 404 | [`ImportError::NotFound`] |
//! | 401 | [`ImportError::Unavailable`] |
//! | other | [`ImportError::ServiceError`] carrying the status |
//!
//! Failures are returned immediately; there are no retries.
//!
//! # Examples
//!
//! ```no_run
//! use dataspace_osti::{HttpTransport, RecordFetcher, SourceConfig};
//!
//! let config = SourceConfig::default();
//! let fetcher = RecordFetcher::new(HttpTransport::new(&config)?);
//! for field in fetcher.fetch("88435")? {
//!     println!("{} = {}", field.key, field.value);
//! }
//! # Ok::<(), dataspace_osti::ImportError>(())
//! ```

use std::fmt;

use tracing::debug;

use crate::error::{ImportError, Result};
use crate::metadata::{parse_metadata, RawMetadataField};
use crate::transport::Transport;

/// Looks up the metadata of individual items.
pub struct RecordFetcher<T> {
    transport: T,
}

impl<T: Transport> RecordFetcher<T> {
    /// Create a fetcher over `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the raw metadata of item `id`.
    ///
    /// `id` may be anything that displays as the identifier, so both
    /// `"88435"` and `88435` work.
    ///
    /// # Errors
    ///
    /// - [`ImportError::InvalidIdentifier`] if `id` renders as an empty string
    /// - [`ImportError::NotFound`], [`ImportError::Unavailable`],
    ///   [`ImportError::ServiceError`] per the status table above
    /// - [`ImportError::Transport`] / [`ImportError::Json`] if no response
    ///   arrived or the body was malformed
    pub fn fetch<I: fmt::Display + ?Sized>(&self, id: &I) -> Result<Vec<RawMetadataField>> {
        let id = id.to_string();
        if id.is_empty() {
            return Err(ImportError::InvalidIdentifier);
        }

        let response = self.transport.get(&format!("/items/{id}/metadata"))?;
        match response.status {
            200 => {
                let fields = parse_metadata(&response.body)?;
                debug!(%id, fields = fields.len(), "fetched item metadata");
                Ok(fields)
            },
            404 => Err(ImportError::NotFound { id }),
            401 => Err(ImportError::Unavailable { id }),
            status => Err(ImportError::ServiceError { id, status }),
        }
    }
}

impl<T> fmt::Debug for RecordFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFetcher").finish_non_exhaustive()
    }
}
