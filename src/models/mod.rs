pub mod block;
pub mod field;
pub mod observation;
pub mod processed;
pub mod sample;

pub use block::{Block, BlockKey, SegmentedRecord};
pub use field::{FeatureField, CONTEXT_FIELDS, MEASUREMENT_FIELDS};
pub use observation::{Measurements, ObservationRecord, ObservationRecordBuilder};
pub use processed::{blocks_to_rows, processed_columns, rows_to_blocks, ProcessedRow};
pub use sample::{Dataset, DatasetSplit, Sample};
