use std::collections::HashMap;

use crate::models::Block;
use crate::processors::{LocationSegmentStats, PurgeOutcome};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationStatistics {
    pub location: String,
    pub records: usize,
    pub candidate_blocks: usize,
    pub retained_blocks: usize,
    pub gaps: usize,
    pub first_day: Option<i64>,
    pub last_day: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentationReport {
    pub block_length: usize,
    pub total_records: usize,
    pub candidate_blocks: usize,
    pub retained_blocks: usize,
    pub purged_blocks: usize,
    pub retained_records: usize,
    pub location_statistics: Vec<LocationStatistics>,
    pub starved_locations: Vec<String>,
}

impl SegmentationReport {
    pub fn from_stages(
        block_length: usize,
        locations: &[LocationSegmentStats],
        purge: &PurgeOutcome,
    ) -> Self {
        let mut retained_per_location: HashMap<&str, usize> = HashMap::new();
        for block in &purge.retained {
            *retained_per_location.entry(block.location()).or_default() += 1;
        }

        let location_statistics = locations
            .iter()
            .map(|stats: &LocationSegmentStats| LocationStatistics {
                location: stats.location.clone(),
                records: stats.records,
                candidate_blocks: stats.candidate_blocks,
                retained_blocks: retained_per_location
                    .get(stats.location.as_str())
                    .copied()
                    .unwrap_or(0),
                gaps: stats.gaps,
                first_day: stats.first_day,
                last_day: stats.last_day,
            })
            .collect();

        Self {
            block_length,
            total_records: locations.iter().map(|s| s.records).sum(),
            candidate_blocks: purge.retained.len() + purge.purged.len(),
            retained_blocks: purge.retained.len(),
            purged_blocks: purge.purged.len(),
            retained_records: purge.retained_records(),
            location_statistics,
            starved_locations: purge.starved_locations.clone(),
        }
    }

    /// Summarise already-purged blocks, e.g. a processed dataset read back from disk.
    pub fn from_blocks(block_length: usize, blocks: &[Block]) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut per_location: HashMap<String, LocationStatistics> = HashMap::new();

        for block in blocks {
            let stats = per_location
                .entry(block.location().to_string())
                .or_insert_with(|| {
                    order.push(block.location().to_string());
                    LocationStatistics {
                        location: block.location().to_string(),
                        ..Default::default()
                    }
                });
            stats.records += block.len();
            stats.candidate_blocks += 1;
            if block.len() >= block_length {
                stats.retained_blocks += 1;
            }
            stats.first_day = match (stats.first_day, block.first_day()) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            stats.last_day = match (stats.last_day, block.last_day()) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
        }

        let location_statistics: Vec<LocationStatistics> = order
            .iter()
            .filter_map(|location| per_location.remove(location))
            .collect();

        let retained_blocks = location_statistics.iter().map(|s| s.retained_blocks).sum();
        let total_records = location_statistics.iter().map(|s| s.records).sum();

        Self {
            block_length,
            total_records,
            candidate_blocks: blocks.len(),
            retained_blocks,
            purged_blocks: blocks.len() - retained_blocks,
            retained_records: blocks
                .iter()
                .filter(|b| b.len() >= block_length)
                .map(Block::len)
                .sum(),
            starved_locations: location_statistics
                .iter()
                .filter(|s| s.retained_blocks == 0)
                .map(|s| s.location.clone())
                .collect(),
            location_statistics,
        }
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Segmentation Report ===\n");
        summary.push_str(&format!("Block Length: {} days\n", self.block_length));
        summary.push_str(&format!("Total Records: {}\n", self.total_records));
        summary.push_str(&format!("Locations: {}\n", self.location_statistics.len()));
        summary.push_str(&format!("Candidate Blocks: {}\n", self.candidate_blocks));
        summary.push_str(&format!(
            "Retained Blocks: {} ({:.1}%)\n",
            self.retained_blocks,
            percentage(self.retained_blocks, self.candidate_blocks)
        ));
        summary.push_str(&format!("Purged Blocks: {}\n", self.purged_blocks));
        summary.push_str(&format!(
            "Retained Records: {} ({:.1}%)\n",
            self.retained_records,
            percentage(self.retained_records, self.total_records)
        ));

        if !self.starved_locations.is_empty() {
            summary.push_str(&format!(
                "\nLocations without a full block: {}\n",
                self.starved_locations.join(", ")
            ));
        }

        let mut busiest: Vec<&LocationStatistics> = self.location_statistics.iter().collect();
        busiest.sort_by(|a, b| b.retained_blocks.cmp(&a.retained_blocks));

        if !busiest.is_empty() {
            summary.push_str("\nTop 10 Locations:\n");
            for (i, stats) in busiest.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {} of {} blocks kept, {} records, {} gaps\n",
                    i + 1,
                    stats.location,
                    stats.retained_blocks,
                    stats.candidate_blocks,
                    stats.records,
                    stats.gaps
                ));
            }
        }

        summary
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::days;
    use crate::processors::{Purger, Segmenter};

    #[test]
    fn test_report_counts() {
        let mut records = days("Albury", 1..=14);
        records.extend(days("Albury", 20..=25));
        records.extend(days("Cobar", 1..=5));

        let segmentation = Segmenter::new(14).unwrap().segment(&records);
        let purge = Purger::new(14).purge(segmentation.blocks);
        let report = SegmentationReport::from_stages(14, &segmentation.locations, &purge);

        assert_eq!(report.total_records, 25);
        assert_eq!(report.candidate_blocks, 3);
        assert_eq!(report.retained_blocks, 1);
        assert_eq!(report.purged_blocks, 2);
        assert_eq!(report.retained_records, 14);
        assert_eq!(report.starved_locations, vec!["Cobar".to_string()]);
        assert_eq!(report.location_statistics[0].gaps, 1);
        assert_eq!(report.location_statistics[0].retained_blocks, 1);

        let summary = report.generate_summary();
        assert!(summary.contains("Retained Blocks: 1"));
        assert!(summary.contains("Cobar"));
    }

    #[test]
    fn test_report_from_blocks() {
        let segmentation = Segmenter::new(3).unwrap().segment(&days("Albury", 1..=7));
        let report = SegmentationReport::from_blocks(3, &segmentation.blocks);

        assert_eq!(report.candidate_blocks, 3);
        assert_eq!(report.retained_blocks, 2);
        assert_eq!(report.retained_records, 6);
        assert_eq!(report.location_statistics[0].first_day, Some(1));
        assert_eq!(report.location_statistics[0].last_day, Some(7));
    }
}
