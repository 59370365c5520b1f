#![doc = include_str!("../README.md")]

//! # Library overview
//!
//! Three independent pieces, composed by the caller:
//!
//! - [`RecordFetcher`] looks up one item's raw metadata
//! - [`CollectionItems`] lazily walks the members of a collection, page by page
//! - [`translate`] / [`RecordTranslator`] turn raw metadata into a
//!   [`TranslatedRecord`] without any I/O
//!
//! [`Importer`] combines them with the skip-or-abort policy used by the
//! `dataspace-import` command, and [`elink`] renders the result as XML.
//!
//! ```no_run
//! use dataspace_osti::{elink, CollectionItems, HttpTransport, RecordFetcher, RecordTranslator,
//!     SourceConfig};
//!
//! let config = SourceConfig::from_env();
//! let transport = HttpTransport::new(&config)?;
//! let fetcher = RecordFetcher::new(&transport);
//! let translator = RecordTranslator::from_config(&config);
//!
//! let mut records = Vec::new();
//! for item in CollectionItems::new(&transport, "2417") {
//!     let fields = fetcher.fetch(item.id())?;
//!     records.push(translator.translate(item.id(), &fields)?);
//! }
//! println!("{}", elink::records_to_xml(&records)?);
//! # Ok::<(), dataspace_osti::ImportError>(())
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Host, contract number and dataset type defaults
//! - [`transport`] — Blocking HTTP access to the DSpace REST API
//! - [`metadata`] — Raw key-value metadata fields
//! - [`fetcher`] — Single-item metadata lookup
//! - [`collection`] — Paginated collection iteration
//! - [`translator`] — DSpace to OSTI field mapping and date normalization
//! - [`elink`] — OSTI E-Link XML rendering
//! - [`importer`] — Batch import policy
//! - [`error`] — Error types and result type

pub mod collection;
pub mod config;
pub mod elink;
pub mod error;
pub mod fetcher;
pub mod importer;
pub mod metadata;
pub mod translator;
pub mod transport;

pub use collection::{CollectionItem, CollectionItems, CursorState, PAGE_LIMIT};
pub use config::{ConfigFile, SourceConfig};
pub use error::{ImportError, Result};
pub use fetcher::RecordFetcher;
pub use importer::{ImportReport, Importer, SkippedItem};
pub use metadata::RawMetadataField;
pub use translator::{
    strtodate, translate, IdentifierType, RecordTranslator, RelatedIdentifier, RelationType,
    TranslatedRecord,
};
pub use transport::{HttpResponse, HttpTransport, Transport};
