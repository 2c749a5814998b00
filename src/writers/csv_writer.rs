use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::models::{blocks_to_rows, processed_columns, Block};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;

/// Writes the processed dataset as CSV, one row per retained record.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_blocks(&self, blocks: &[Block], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let rows = self.write_to(blocks, BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))?;
        debug!("Wrote {} processed rows to {}", rows, path.display());
        Ok(())
    }

    /// Returns the number of rows written. The header is always written,
    /// so an empty dataset still reads back as zero blocks.
    pub fn write_to<W: Write>(&self, blocks: &[Block], writer: W) -> Result<usize> {
        let rows = blocks_to_rows(blocks);
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(processed_columns())?;
        for row in &rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(rows.len())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
