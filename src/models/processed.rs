use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{
    Block, BlockKey, ObservationRecord, SegmentedRecord, CONTEXT_FIELDS, MEASUREMENT_FIELDS,
};
use crate::utils::constants::{BLOCK_COLUMN, ID_COLUMN, LOCATION_COLUMN};

/// One row of the processed dataset, indexed by `(Location, Block, Id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessedRow {
    pub location: String,
    pub block: u32,
    pub id: u32,
    pub min_temp: f64,
    pub max_temp: f64,
    pub rainfall: f64,
    pub wind_gust_speed: f64,
    pub wind_speed_9am: f64,
    pub wind_speed_3pm: f64,
    pub humidity_9am: f64,
    pub humidity_3pm: f64,
    pub pressure_9am: f64,
    pub pressure_3pm: f64,
    pub cloud_9am: f64,
    pub cloud_3pm: f64,
    pub temp_9am: f64,
    pub temp_3pm: f64,
    pub day_index: i64,
    pub year: i32,
    pub month: u32,
    pub location_hash: i64,
}

impl From<SegmentedRecord> for ProcessedRow {
    fn from(segmented: SegmentedRecord) -> Self {
        let r = segmented.record;
        Self {
            location: segmented.key.location,
            block: segmented.key.block,
            id: segmented.slot as u32,
            min_temp: r.min_temp,
            max_temp: r.max_temp,
            rainfall: r.rainfall,
            wind_gust_speed: r.wind_gust_speed,
            wind_speed_9am: r.wind_speed_9am,
            wind_speed_3pm: r.wind_speed_3pm,
            humidity_9am: r.humidity_9am,
            humidity_3pm: r.humidity_3pm,
            pressure_9am: r.pressure_9am,
            pressure_3pm: r.pressure_3pm,
            cloud_9am: r.cloud_9am,
            cloud_3pm: r.cloud_3pm,
            temp_9am: r.temp_9am,
            temp_3pm: r.temp_3pm,
            day_index: r.day_index,
            year: r.year,
            month: r.month,
            location_hash: r.location_hash,
        }
    }
}

impl From<ProcessedRow> for SegmentedRecord {
    fn from(row: ProcessedRow) -> Self {
        let record = ObservationRecord {
            location: row.location.clone(),
            min_temp: row.min_temp,
            max_temp: row.max_temp,
            rainfall: row.rainfall,
            wind_gust_speed: row.wind_gust_speed,
            wind_speed_9am: row.wind_speed_9am,
            wind_speed_3pm: row.wind_speed_3pm,
            humidity_9am: row.humidity_9am,
            humidity_3pm: row.humidity_3pm,
            pressure_9am: row.pressure_9am,
            pressure_3pm: row.pressure_3pm,
            cloud_9am: row.cloud_9am,
            cloud_3pm: row.cloud_3pm,
            temp_9am: row.temp_9am,
            temp_3pm: row.temp_3pm,
            day_index: row.day_index,
            year: row.year,
            month: row.month,
            location_hash: row.location_hash,
        };
        SegmentedRecord {
            key: BlockKey::new(row.location, row.block),
            slot: row.id as usize,
            record,
        }
    }
}

/// Header of the processed dataset, in `ProcessedRow` field order.
pub fn processed_columns() -> Vec<&'static str> {
    [LOCATION_COLUMN, BLOCK_COLUMN, ID_COLUMN]
        .into_iter()
        .chain(
            MEASUREMENT_FIELDS
                .iter()
                .chain(CONTEXT_FIELDS.iter())
                .map(|f| f.column_name()),
        )
        .collect()
}

pub fn blocks_to_rows(blocks: &[Block]) -> Vec<ProcessedRow> {
    blocks
        .iter()
        .flat_map(Block::segmented_records)
        .map(ProcessedRow::from)
        .collect()
}

/// Regroup persisted rows by `(Location, Block)`. Groups keep file order;
/// rows inside a group are ordered by `Id`.
pub fn rows_to_blocks(rows: Vec<ProcessedRow>) -> Vec<Block> {
    let mut index: HashMap<BlockKey, usize> = HashMap::new();
    let mut groups: Vec<(BlockKey, Vec<SegmentedRecord>)> = Vec::new();

    for row in rows {
        let segmented = SegmentedRecord::from(row);
        let position = *index.entry(segmented.key.clone()).or_insert_with(|| {
            groups.push((segmented.key.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push(segmented);
    }

    groups
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by_key(|m| m.slot);
            Block::new(key, members.into_iter().map(|m| m.record).collect())
        })
        .collect()
}
