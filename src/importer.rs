//! Batch import: fetch, then translate.
//!
//! [`Importer`] wires a [`RecordFetcher`] to a [`RecordTranslator`] and applies
//! the run-level policy:
//!
//! - a single-item import surfaces every error, so the caller can abort;
//! - a collection import skips members that are missing or restricted,
//!   records them in the [`ImportReport`], and keeps going. Any other error,
//!   including an unparseable issue date, stops the import.
//!
//! ```no_run
//! use dataspace_osti::{HttpTransport, Importer, SourceConfig};
//!
//! let config = SourceConfig::from_env();
//! let importer = Importer::new(HttpTransport::new(&config)?, &config);
//! let report = importer.import_collection("2417")?;
//! println!("{} translated, {} skipped", report.records.len(), report.skipped.len());
//! # Ok::<(), dataspace_osti::ImportError>(())
//! ```

use std::fmt;

use tracing::{info, warn};

use crate::collection::CollectionItems;
use crate::config::SourceConfig;
use crate::error::Result;
use crate::fetcher::RecordFetcher;
use crate::transport::Transport;
use crate::translator::{RecordTranslator, TranslatedRecord};

/// A collection member that was left out of the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// Identifier of the member
    pub id: String,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of a collection import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Translated members, in collection order
    pub records: Vec<TranslatedRecord>,
    /// Members that were not found or not available
    pub skipped: Vec<SkippedItem>,
}

/// Fetches and translates items from one source.
pub struct Importer<T> {
    fetcher: RecordFetcher<T>,
    translator: RecordTranslator,
}

impl<T: Transport> Importer<T> {
    /// Importer over `transport`, translating with the defaults in `config`.
    pub fn new(transport: T, config: &SourceConfig) -> Self {
        Self::with_translator(transport, RecordTranslator::from_config(config))
    }

    /// Importer with an explicit translator.
    pub fn with_translator(transport: T, translator: RecordTranslator) -> Self {
        Self {
            fetcher: RecordFetcher::new(transport),
            translator,
        }
    }

    /// Fetch and translate one item.
    ///
    /// # Errors
    ///
    /// Propagates every error from [`RecordFetcher::fetch`] and
    /// [`RecordTranslator::translate`].
    pub fn import_item(&self, id: &str) -> Result<TranslatedRecord> {
        let fields = self.fetcher.fetch(id)?;
        self.translator.translate(id, &fields)
    }

    /// Fetch and translate every member of a collection.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not
    /// [`is_skippable`](crate::ImportError::is_skippable).
    pub fn import_collection(&self, collection_id: &str) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        for item in CollectionItems::new(self.fetcher.transport(), collection_id) {
            match self.import_item(item.id()) {
                Ok(record) => report.records.push(record),
                Err(e) if e.is_skippable() => {
                    warn!(id = item.id(), error = %e, "skipping collection member");
                    report.skipped.push(SkippedItem {
                        id: item.id().to_string(),
                        reason: e.to_string(),
                    });
                },
                Err(e) => return Err(e),
            }
        }

        info!(
            collection = collection_id,
            translated = report.records.len(),
            skipped = report.skipped.len(),
            "collection import finished"
        );
        Ok(report)
    }
}

impl<T> fmt::Debug for Importer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Importer")
            .field("translator", &self.translator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use crate::transport::HttpResponse;
    use crate::ImportError;

    fn config() -> SourceConfig {
        SourceConfig {
            contract_no: Some("AC02-09CH11466".to_string()),
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_import_item() {
        let body = r#"[{"key":"dc.title","value":"T"},{"key":"dc.date.issued","value":"2019"}]"#;
        let importer = Importer::new(MockTransport::new([HttpResponse::new(200, body)]), &config());
        let record = importer.import_item("12").unwrap();
        assert_eq!(record.accession_num, "12");
        assert_eq!(record.contract_nos.as_deref(), Some("AC02-09CH11466"));
        assert_eq!(record.publication_date.as_deref(), Some("01/01/2019"));
    }

    #[test]
    fn test_import_item_propagates_not_found() {
        let importer = Importer::new(MockTransport::new([HttpResponse::new(404, "")]), &config());
        assert!(matches!(
            importer.import_item("12").unwrap_err(),
            ImportError::NotFound { .. }
        ));
    }

    #[test]
    fn test_collection_skips_missing_and_restricted_members() {
        let mock = MockTransport::new([
            HttpResponse::new(200, r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#),
            HttpResponse::new(200, r#"[{"key":"dc.title","value":"one"}]"#),
            HttpResponse::new(404, ""),
            HttpResponse::new(401, ""),
            HttpResponse::new(200, "[]"),
        ]);
        let importer = Importer::new(&mock, &config());

        let report = importer.import_collection("9").unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].title.as_deref(), Some("one"));
        assert_eq!(
            report.skipped.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec!["2", "3"]
        );
        assert_eq!(
            mock.requests(),
            vec![
                "/collections/9/items?limit=100&offset=0",
                "/items/1/metadata",
                "/items/2/metadata",
                "/items/3/metadata",
                "/collections/9/items?limit=100&offset=3",
            ]
        );
    }

    #[test]
    fn test_collection_stops_on_bad_date() {
        let mock = MockTransport::new([
            HttpResponse::new(200, r#"[{"id": 1}, {"id": 2}]"#),
            HttpResponse::new(200, r#"[{"key":"dc.date.issued","value":"someday"}]"#),
        ]);
        let importer = Importer::new(&mock, &config());
        assert!(matches!(
            importer.import_collection("9").unwrap_err(),
            ImportError::InvalidDateFormat(_)
        ));
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_collection_stops_on_service_error() {
        let mock = MockTransport::new([
            HttpResponse::new(200, r#"[{"id": 1}]"#),
            HttpResponse::new(502, ""),
        ]);
        let importer = Importer::new(&mock, &config());
        assert!(matches!(
            importer.import_collection("9").unwrap_err(),
            ImportError::ServiceError { status: 502, .. }
        ));
    }
}
