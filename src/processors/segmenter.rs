use std::collections::HashMap;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{Block, BlockKey, ObservationRecord, SegmentedRecord};

/// The records of one location, in the order they appeared in the table.
#[derive(Debug, Clone)]
pub struct LocationGroup<'a> {
    pub location: &'a str,
    pub records: Vec<&'a ObservationRecord>,
}

/// Stable partition by location. Locations keep their first-appearance order
/// and records keep their table order inside each group; nothing is sorted.
pub fn group_by_location(records: &[ObservationRecord]) -> Vec<LocationGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<LocationGroup<'_>> = Vec::new();

    for record in records {
        let position = *index.entry(record.location.as_str()).or_insert_with(|| {
            groups.push(LocationGroup {
                location: record.location.as_str(),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].records.push(record);
    }

    groups
}

/// Counters collected while cutting one location into blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSegmentStats {
    pub location: String,
    pub records: usize,
    pub candidate_blocks: usize,
    /// Blocks started because the day sequence broke.
    pub gaps: usize,
    /// Blocks started because the previous block was full.
    pub rollovers: usize,
    pub first_day: Option<i64>,
    pub last_day: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub blocks: Vec<Block>,
    pub locations: Vec<LocationSegmentStats>,
}

impl Segmentation {
    pub fn total_records(&self) -> usize {
        self.locations.iter().map(|s| s.records).sum()
    }

    /// Every record tagged with its block key and slot, in block order.
    pub fn assignments(&self) -> Vec<SegmentedRecord> {
        self.blocks
            .iter()
            .flat_map(|block| block.segmented_records())
            .collect()
    }
}

/// Cuts each location's day sequence into blocks of at most `block_length`
/// records, starting a new block at every discontinuity.
pub struct Segmenter {
    block_length: usize,
}

impl Segmenter {
    pub fn new(block_length: usize) -> Result<Self> {
        if block_length == 0 {
            return Err(ProcessingError::Config(
                "block length must be at least 1".to_string(),
            ));
        }
        Ok(Self { block_length })
    }

    pub fn block_length(&self) -> usize {
        self.block_length
    }

    pub fn segment(&self, records: &[ObservationRecord]) -> Segmentation {
        let mut segmentation = Segmentation::default();

        for group in group_by_location(records) {
            let (blocks, stats) = self.segment_group(&group);
            debug!(
                location = %stats.location,
                records = stats.records,
                blocks = stats.candidate_blocks,
                gaps = stats.gaps,
                "segmented location"
            );
            segmentation.blocks.extend(blocks);
            segmentation.locations.push(stats);
        }

        segmentation
    }

    /// Assign `(BlockKey, slot)` to every record.
    pub fn assign(&self, records: &[ObservationRecord]) -> Vec<SegmentedRecord> {
        self.segment(records).assignments()
    }

    fn segment_group(&self, group: &LocationGroup<'_>) -> (Vec<Block>, LocationSegmentStats) {
        let mut stats = LocationSegmentStats {
            location: group.location.to_string(),
            records: group.records.len(),
            first_day: group.records.first().map(|r| r.day_index),
            last_day: group.records.last().map(|r| r.day_index),
            ..Default::default()
        };

        let Some(first) = group.records.first() else {
            return (Vec::new(), stats);
        };

        let mut blocks = Vec::new();
        let mut block_number: u32 = 0;
        let mut slot = 0;
        // Seeded from the first record so it never counts as a gap.
        let mut previous = first.day_index;
        let mut current: Vec<ObservationRecord> = Vec::with_capacity(self.block_length);

        for (i, record) in group.records.iter().enumerate() {
            let full = slot == self.block_length;
            let gap = i > 0 && record.day_index != previous + 1;

            if full || gap {
                if gap {
                    stats.gaps += 1;
                }
                if full {
                    stats.rollovers += 1;
                }
                blocks.push(Block::new(
                    BlockKey::new(group.location, block_number),
                    std::mem::take(&mut current),
                ));
                block_number += 1;
                slot = 0;
            }

            current.push((*record).clone());
            slot += 1;
            previous = record.day_index;
        }

        blocks.push(Block::new(BlockKey::new(group.location, block_number), current));
        stats.candidate_blocks = blocks.len();

        (blocks, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{days, record};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_by_location_preserves_order() {
        let records = vec![
            record("Sydney", 5),
            record("Albury", 1),
            record("Sydney", 6),
            record("Albury", 2),
            record("Sydney", 4),
        ];

        let groups = group_by_location(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].location, "Sydney");
        assert_eq!(groups[1].location, "Albury");
        let sydney_days: Vec<i64> = groups[0].records.iter().map(|r| r.day_index).collect();
        assert_eq!(sydney_days, vec![5, 6, 4]);
    }

    #[test]
    fn test_first_record_lands_in_block_zero_slot_zero() {
        let segmenter = Segmenter::new(3).unwrap();
        let assignments = segmenter.assign(&days("Albury", 100..=101));

        assert_eq!(assignments[0].key, BlockKey::new("Albury", 0));
        assert_eq!(assignments[0].slot, 0);
        assert_eq!(assignments[1].key, BlockKey::new("Albury", 0));
        assert_eq!(assignments[1].slot, 1);
    }

    #[test]
    fn test_capacity_rollover() {
        let segmenter = Segmenter::new(3).unwrap();
        let segmentation = segmenter.segment(&days("Albury", 1..=7));

        let sizes: Vec<usize> = segmentation.blocks.iter().map(Block::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(segmentation.locations[0].rollovers, 2);
        assert_eq!(segmentation.locations[0].gaps, 0);

        let slots: Vec<usize> = segmentation.assignments().iter().map(|a| a.slot).collect();
        assert_eq!(slots, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_gap_starts_new_block() {
        let segmenter = Segmenter::new(13).unwrap();
        let mut records = days("Albury", 1..=13);
        records.extend(days("Albury", 20..=32));

        let segmentation = segmenter.segment(&records);

        assert_eq!(segmentation.blocks.len(), 2);
        assert_eq!(segmentation.blocks[0].len(), 13);
        assert_eq!(segmentation.blocks[1].len(), 13);
        assert_eq!(segmentation.blocks[1].key().block, 1);
        assert_eq!(segmentation.blocks[1].first_day(), Some(20));
        // Full block followed by a gap still opens only one new block.
        assert_eq!(segmentation.locations[0].gaps, 1);
        assert_eq!(segmentation.locations[0].rollovers, 1);
    }

    #[test]
    fn test_blocks_are_contiguous_and_bounded() {
        let segmenter = Segmenter::new(4).unwrap();
        let day_list = [1, 2, 3, 5, 6, 7, 8, 9, 10, 12, 14, 15];
        let records: Vec<_> = day_list.iter().map(|&d| record("Cobar", d)).collect();

        let segmentation = segmenter.segment(&records);

        for block in &segmentation.blocks {
            assert!(block.is_contiguous(), "block {} not contiguous", block.key());
            assert!(block.len() <= 4);
        }
        assert_eq!(segmentation.total_records(), day_list.len());
    }

    #[test]
    fn test_out_of_order_days_are_not_resorted() {
        let segmenter = Segmenter::new(5).unwrap();
        let records: Vec<_> = [3, 2, 1].iter().map(|&d| record("Moree", d)).collect();

        let segmentation = segmenter.segment(&records);

        // Descending days are never consecutive, so each lands alone.
        assert_eq!(segmentation.blocks.len(), 3);
        assert_eq!(segmentation.blocks[0].first_day(), Some(3));
    }

    #[test]
    fn test_locations_are_independent() {
        let segmenter = Segmenter::new(2).unwrap();
        let records = vec![
            record("Albury", 1),
            record("Sydney", 1),
            record("Albury", 2),
            record("Sydney", 2),
        ];

        let segmentation = segmenter.segment(&records);
        let keys: Vec<String> = segmentation.blocks.iter().map(|b| b.key().to_string()).collect();
        assert_eq!(keys, vec!["Albury#0", "Sydney#0"]);
    }

    #[test]
    fn test_zero_block_length_rejected() {
        assert!(matches!(Segmenter::new(0), Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_empty_table() {
        let segmenter = Segmenter::new(3).unwrap();
        let segmentation = segmenter.segment(&[]);
        assert!(segmentation.blocks.is_empty());
        assert!(segmentation.locations.is_empty());
    }
}
