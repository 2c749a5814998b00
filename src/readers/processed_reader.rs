use csv::StringRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::models::{rows_to_blocks, Block, ProcessedRow};
use crate::readers::record_reader::{check_headers, schema_or_csv};
use crate::utils::constants::{BLOCK_COLUMN, DEFAULT_BUFFER_SIZE, ID_COLUMN};
use crate::utils::filename::DatasetFormat;
use crate::writers::ParquetWriter;

/// Loads a processed dataset (CSV or Parquet) back into blocks.
pub struct ProcessedDatasetReader;

impl ProcessedDatasetReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_blocks(&self, path: &Path) -> Result<Vec<Block>> {
        let blocks = match DatasetFormat::from_path(path) {
            Some(DatasetFormat::Csv) => {
                let file = File::open(path)?;
                self.read_csv(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))?
            }
            Some(DatasetFormat::Parquet) => ParquetWriter::new().read_blocks(path)?,
            None => {
                return Err(ProcessingError::InvalidFormat(format!(
                    "cannot tell processed dataset format of {}",
                    path.display()
                )))
            }
        };

        info!("Loaded {} blocks from {}", blocks.len(), path.display());
        Ok(blocks)
    }

    pub fn read_csv<R: Read>(&self, reader: R) -> Result<Vec<Block>> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        check_index_headers(&headers)?;
        check_headers(&headers)?;

        let rows = csv_reader
            .deserialize::<ProcessedRow>()
            .map(|row| row.map_err(schema_or_csv))
            .collect::<Result<Vec<_>>>()?;

        Ok(rows_to_blocks(rows))
    }
}

impl Default for ProcessedDatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

fn check_index_headers(headers: &StringRecord) -> Result<()> {
    for column in [BLOCK_COLUMN, ID_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(ProcessingError::schema(format!(
                "processed dataset lacks index column {}",
                column
            )));
        }
    }
    Ok(())
}
