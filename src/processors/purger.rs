use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::ProcessingError;
use crate::models::{Block, BlockKey};

#[derive(Debug, Clone, Default)]
pub struct PurgeOutcome {
    pub retained: Vec<Block>,
    pub purged: Vec<BlockKey>,
    /// Locations that entered the purge with blocks and left with none.
    pub starved_locations: Vec<String>,
}

impl PurgeOutcome {
    pub fn retained_records(&self) -> usize {
        self.retained.iter().map(Block::len).sum()
    }
}

/// Drops every block shorter than the required length. Short blocks are
/// never merged with neighbours or salvaged.
pub struct Purger {
    block_length: usize,
}

impl Purger {
    pub fn new(block_length: usize) -> Self {
        Self { block_length }
    }

    pub fn purge(&self, blocks: Vec<Block>) -> PurgeOutcome {
        let mut outcome = PurgeOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut seen_locations: Vec<String> = Vec::new();
        let mut fed_locations: HashSet<String> = HashSet::new();

        for block in blocks {
            if seen.insert(block.location().to_string()) {
                seen_locations.push(block.location().to_string());
            }

            if block.len() < self.block_length {
                debug!(block = %block.key(), len = block.len(), "purging short block");
                outcome.purged.push(block.key().clone());
            } else {
                fed_locations.insert(block.location().to_string());
                outcome.retained.push(block);
            }
        }

        for location in seen_locations {
            if !fed_locations.contains(&location) {
                let starved = ProcessingError::InsufficientBlocks {
                    location: location.clone(),
                };
                warn!("{}", starved);
                outcome.starved_locations.push(location);
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::days;
    use crate::processors::Segmenter;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_drops_only_short_blocks() {
        let mut records = days("Albury", 1..=5);
        records.extend(days("Albury", 10..=11));
        records.extend(days("Albury", 20..=24));

        let segmentation = Segmenter::new(5).unwrap().segment(&records);
        let outcome = Purger::new(5).purge(segmentation.blocks);

        assert_eq!(outcome.retained.len(), 2);
        assert_eq!(outcome.purged, vec![BlockKey::new("Albury", 1)]);
        assert_eq!(outcome.retained_records(), 10);
        assert!(outcome.starved_locations.is_empty());
    }

    #[test]
    fn test_reports_starved_location() {
        let mut records = days("Albury", 1..=10);
        records.extend(days("Sydney", 1..=14));

        let segmentation = Segmenter::new(14).unwrap().segment(&records);
        let outcome = Purger::new(14).purge(segmentation.blocks);

        assert_eq!(outcome.retained.len(), 1);
        assert_eq!(outcome.retained[0].location(), "Sydney");
        assert_eq!(outcome.starved_locations, vec!["Albury".to_string()]);
    }

    #[test]
    fn test_preserves_block_order() {
        let mut records = days("Sydney", 1..=3);
        records.extend(days("Albury", 1..=3));
        records.extend(days("Sydney", 5..=7));

        let segmentation = Segmenter::new(3).unwrap().segment(&records);
        let outcome = Purger::new(3).purge(segmentation.blocks);

        let keys: Vec<String> = outcome.retained.iter().map(|b| b.key().to_string()).collect();
        assert_eq!(keys, vec!["Sydney#0", "Sydney#1", "Albury#0"]);
    }
}
