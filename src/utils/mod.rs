pub mod constants;
pub mod filename;
pub mod locations;
pub mod progress;

pub use constants::*;
pub use filename::{
    generate_default_processed_filename, generate_default_split_filename, DatasetFormat,
};
pub use locations::{LocationCodes, StationTable, AUSTRALIAN_STATIONS};
