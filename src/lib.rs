pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

#[cfg(test)]
mod fixtures;

pub use config::PipelineConfig;
pub use error::{ProcessingError, Result};
pub use processors::{build_dataset, build_dataset_from_blocks, prepare_dataset, window_single_sample};
