use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ObservationRecord;

/// Identifies one candidate window: a location and its running block number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockKey {
    pub location: String,
    pub block: u32,
}

impl BlockKey {
    pub fn new(location: impl Into<String>, block: u32) -> Self {
        Self {
            location: location.into(),
            block,
        }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.location, self.block)
    }
}

/// A record together with the block and slot the segmenter assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedRecord {
    pub key: BlockKey,
    pub slot: usize,
    pub record: ObservationRecord,
}

/// Records sharing a [`BlockKey`], ordered by slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    key: BlockKey,
    records: Vec<ObservationRecord>,
}

impl Block {
    pub fn new(key: BlockKey, records: Vec<ObservationRecord>) -> Self {
        Self { key, records }
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn location(&self) -> &str {
        &self.key.location
    }

    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when every consecutive pair of records is one day apart.
    pub fn is_contiguous(&self) -> bool {
        self.records.windows(2).all(|pair| pair[1].follows(&pair[0]))
    }

    pub fn first_day(&self) -> Option<i64> {
        self.records.first().map(|r| r.day_index)
    }

    pub fn last_day(&self) -> Option<i64> {
        self.records.last().map(|r| r.day_index)
    }

    /// Flatten back into slot-tagged rows, the shape persisted on disk.
    pub fn segmented_records(&self) -> impl Iterator<Item = SegmentedRecord> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(move |(slot, record)| SegmentedRecord {
                key: self.key.clone(),
                slot,
                record: record.clone(),
            })
    }
}
