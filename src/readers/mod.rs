pub mod payload_reader;
pub mod processed_reader;
pub mod raw_reader;
pub mod record_reader;

pub use payload_reader::PayloadReader;
pub use processed_reader::ProcessedDatasetReader;
pub use raw_reader::{RawObservationReader, RawTable};
pub use record_reader::{RecordTableReader, RECORD_TABLE_COLUMNS};
