//! In-memory document catalog for one session.
//!
//! The catalog is rebuilt from the feed at every session start and is
//! read-only afterwards. Records are kept sorted ascending by id.

use crate::library::model::{CatalogRecord, RecordId};

/// Ordered, immutable set of valid records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    /// Build a catalog, ordering records by id.
    ///
    /// The sort is stable, so records sharing an id keep their input order.
    pub fn from_records(mut records: Vec<CatalogRecord>) -> Self {
        records.sort_by_key(|r| r.id);
        Self { records }
    }

    /// Look up a record by id.
    pub fn get(&self, id: RecordId) -> Option<&CatalogRecord> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|pos| &self.records[pos])
    }

    /// All records in id order.
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogRecord> {
        self.records.iter()
    }

    /// Number of records in the catalog.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogRecord;
    type IntoIter = std::slice::Iter<'a, CatalogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
