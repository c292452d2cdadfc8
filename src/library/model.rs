//! Core data types for the document catalog.
//!
//! A feed row becomes a [`CatalogRecord`] only once every required field
//! has been validated; there is no partially-populated record type.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// Stable identity of a catalog entry, also its default display rank.
///
/// Uses `NonZeroU64` so a zero or negative id can never be materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct RecordId(NonZeroU64);

impl RecordId {
    /// Create a `RecordId` from a raw `u64`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(RecordId)
    }

    /// Parse a feed cell as a base-10 id.
    ///
    /// Reads the leading run of digits after surrounding whitespace and an
    /// optional `+`, ignoring whatever follows (`"12abc"` is 12, `"3.0"` is 3).
    /// Yields `None` when there are no leading digits, or the value is zero
    /// or does not fit in a `u64`.
    pub fn parse(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        let unsigned = cell.strip_prefix('+').unwrap_or(cell);
        let end = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());
        unsigned[..end].parse::<u64>().ok().and_then(Self::new)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, downloadable document listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Unique id, also used for ordering.
    pub id: RecordId,
    /// Trimmed, non-empty display title.
    pub title: String,
    /// Trimmed, non-empty link to the actual document.
    pub source_link: String,
}

impl CatalogRecord {
    /// Build a record from raw cell values, trimming text fields.
    ///
    /// Returns `None` when the id is invalid or either text field is blank.
    pub fn from_cells(id: &str, title: &str, source_link: &str) -> Option<Self> {
        let id = RecordId::parse(id)?;
        let title = title.trim();
        let source_link = source_link.trim();
        if title.is_empty() || source_link.is_empty() {
            return None;
        }
        Some(Self {
            id,
            title: title.to_string(),
            source_link: source_link.to_string(),
        })
    }
}

/// Per-record status of the download proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProxyState {
    /// No request outstanding.
    #[default]
    Idle,
    /// A shortening request has been sent and not yet resolved.
    InFlight,
}
