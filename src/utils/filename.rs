use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

fn date_stamp() -> String {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    format!("{:02}{:02}{:02}", year, now.month(), now.day())
}

/// Generate default processed dataset filename: weather-processed-{YYMMDD}.parquet
pub fn generate_default_processed_filename() -> PathBuf {
    let filename = format!("weather-processed-{}.parquet", date_stamp());
    PathBuf::from("output").join(filename)
}

/// Generate default split filename: weather-split-{YYMMDD}.json
pub fn generate_default_split_filename() -> PathBuf {
    let filename = format!("weather-split-{}.json", date_stamp());
    PathBuf::from("output").join(filename)
}

/// Storage format of a processed dataset, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Parquet,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DatasetFormat::Csv),
            "parquet" | "pq" => Some(DatasetFormat::Parquet),
            _ => None,
        }
    }
}
