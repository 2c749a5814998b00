use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Schema error: {message}")]
    Schema { message: String },

    #[error("Location {location} has no block of the required length")]
    InsufficientBlocks { location: String },

    #[error(
        "Block {block} of {location} holds {actual} records, expected exactly {expected}"
    )]
    InvariantViolation {
        location: String,
        block: u32,
        expected: usize,
        actual: usize,
    },

    #[error("No samples survived segmentation and purging")]
    EmptyDataset,

    #[error("Expected exactly {expected} day records for a sample, got {actual}")]
    WrongSampleLength { expected: usize, actual: usize },

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    pub fn schema(message: impl Into<String>) -> Self {
        ProcessingError::Schema {
            message: message.into(),
        }
    }
}
