//! Deduplicating record list owned by the single aggregation consumer

use tracing::debug;

use crate::domain::Record;

/// Records in arrival order, at most one per identity tuple.
///
/// Lookup is a linear scan over everything accepted so far.
#[derive(Debug, Default)]
pub struct RecordAggregator {
    records: Vec<Record>,
    duplicates: usize,
}

impl RecordAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `record` unless a record with the same identity is already
    /// held. Returns whether it was accepted.
    pub fn offer(&mut self, record: Record) -> bool {
        let identity = record.identity();
        if self.records.iter().any(|r| r.identity() == identity) {
            debug!(link = %record.link, "Dropping duplicate of an already collected listing");
            self.duplicates += 1;
            return false;
        }

        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
