//! Lazy, paginated iteration over the members of a collection.
//!
//! [`CollectionItems`] requests `GET /collections/{id}/items?limit=100&offset=N`
//! only when its buffer runs dry, so callers iterate over a collection of any
//! size without dealing with page boundaries:
//!
//! ```no_run
//! use dataspace_osti::{CollectionItems, HttpTransport, SourceConfig};
//!
//! let transport = HttpTransport::new(&SourceConfig::default())?;
//! for item in CollectionItems::new(&transport, "2417") {
//!     println!("member {}", item.id());
//! }
//! # Ok::<(), dataspace_osti::ImportError>(())
//! ```
//!
//! Page failures end the sequence instead of raising: a non-200 status, a
//! transport error or a body that is not an array of item descriptors is
//! logged as a warning and the iterator becomes exhausted. An empty page ends
//! it the same way. A long collection import therefore degrades to a
//! truncated one rather than aborting.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::transport::Transport;

/// Number of items requested per page.
pub const PAGE_LIMIT: usize = 100;

/// Identifier-bearing descriptor of one collection member.
///
/// Only the `id` is interpreted; it is normalized to a string whether the
/// source sent a number or a string. Every other key is kept in
/// [`extra`](Self::extra) in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    #[serde(deserialize_with = "id_from_string_or_number")]
    id: String,
    /// Remaining descriptor keys (`name`, `handle`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionItem {
    /// Descriptor with just an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }

    /// Identifier to hand to [`RecordFetcher::fetch`](crate::RecordFetcher::fetch).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Iteration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Items may remain, buffered or upstream.
    Buffered,
    /// Terminal: upstream returned an empty or failed page.
    Exhausted,
}

/// Forward-only iterator over the members of one collection.
///
/// Owns its cursor; to start over, construct a new iterator.
pub struct CollectionItems<T> {
    transport: T,
    collection_id: String,
    offset: usize,
    buffer: VecDeque<CollectionItem>,
    state: CursorState,
}

impl<T: Transport> CollectionItems<T> {
    /// Iterator positioned at offset 0 of `collection_id`.
    ///
    /// No request is made until the first call to `next`.
    pub fn new(transport: T, collection_id: impl fmt::Display) -> Self {
        Self {
            transport,
            collection_id: collection_id.to_string(),
            offset: 0,
            buffer: VecDeque::with_capacity(PAGE_LIMIT),
            state: CursorState::Buffered,
        }
    }

    /// Collection being iterated.
    #[must_use]
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// Number of items received from upstream so far.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current state of the cursor.
    #[must_use]
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// `true` once the sequence has ended.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    /// Request the page at the current offset.
    ///
    /// `None` means the page could not be used and iteration must stop.
    fn fetch_page(&self) -> Option<Vec<CollectionItem>> {
        let path = format!(
            "/collections/{}/items?limit={}&offset={}",
            self.collection_id, PAGE_LIMIT, self.offset
        );

        let response = match self.transport.get(&path) {
            Ok(response) => response,
            Err(e) => {
                warn!(collection = %self.collection_id, offset = self.offset, error = %e,
                    "collection page request failed");
                return None;
            },
        };

        if !response.is_ok() {
            warn!(collection = %self.collection_id, offset = self.offset,
                status = response.status, "collection page returned non-success status");
            return None;
        }

        match serde_json::from_str::<Vec<CollectionItem>>(&response.body) {
            Ok(items) => Some(items),
            Err(e) => {
                warn!(collection = %self.collection_id, offset = self.offset, error = %e,
                    "malformed collection page");
                None
            },
        }
    }
}

impl<T: Transport> Iterator for CollectionItems<T> {
    type Item = CollectionItem;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(item);
            }
            if self.state == CursorState::Exhausted {
                return None;
            }

            match self.fetch_page() {
                Some(items) if !items.is_empty() => {
                    self.offset += items.len();
                    debug!(collection = %self.collection_id, received = items.len(),
                        offset = self.offset, "buffered collection page");
                    self.buffer.extend(items);
                },
                _ => {
                    debug!(collection = %self.collection_id, offset = self.offset,
                        "collection exhausted");
                    self.state = CursorState::Exhausted;
                },
            }
        }
    }
}

impl<T: Transport> FusedIterator for CollectionItems<T> {}

impl<T> fmt::Debug for CollectionItems<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionItems")
            .field("collection_id", &self.collection_id)
            .field("offset", &self.offset)
            .field("buffered", &self.buffer.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
