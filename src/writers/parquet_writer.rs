use crate::error::{ProcessingError, Result};
use crate::models::{
    rows_to_blocks, Block, BlockKey, FeatureField, Measurements,
    ObservationRecordBuilder, ProcessedRow, SegmentedRecord, MEASUREMENT_FIELDS,
};
use crate::utils::constants::{
    BLOCK_COLUMN, COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY,
    COMPRESSION_ZSTD, DEFAULT_BATCH_SIZE, DEFAULT_ROW_GROUP_SIZE, ID_COLUMN, LOCATION_COLUMN,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write retained blocks as processed rows, one batch per `batch_size` rows.
    pub fn write_blocks(&self, blocks: &[Block], path: &Path) -> Result<()> {
        self.write_blocks_batched(blocks, path, DEFAULT_BATCH_SIZE)
    }

    pub fn write_blocks_batched(
        &self,
        blocks: &[Block],
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        let rows: Vec<SegmentedRecord> = blocks.iter().flat_map(Block::segmented_records).collect();
        let schema = Self::create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in rows.chunks(batch_size.max(1)) {
            let batch = Self::rows_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        debug!("Wrote {} processed rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// Arrow schema of the processed dataset
    pub fn create_schema() -> Arc<Schema> {
        let mut fields = vec![
            Field::new(LOCATION_COLUMN, DataType::Utf8, false),
            Field::new(BLOCK_COLUMN, DataType::UInt32, false),
            Field::new(ID_COLUMN, DataType::UInt32, false),
        ];
        fields.extend(
            MEASUREMENT_FIELDS
                .iter()
                .map(|f| Field::new(f.column_name(), DataType::Float64, false)),
        );
        fields.extend([
            Field::new(FeatureField::DayIndex.column_name(), DataType::Int64, false),
            Field::new(FeatureField::Year.column_name(), DataType::Int32, false),
            Field::new(FeatureField::Month.column_name(), DataType::UInt32, false),
            Field::new(FeatureField::LocationHash.column_name(), DataType::Int64, false),
        ]);

        Arc::new(Schema::new(fields))
    }

    fn rows_to_batch(rows: &[SegmentedRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let locations: Vec<&str> = rows.iter().map(|r| r.key.location.as_str()).collect();
        let blocks: Vec<u32> = rows.iter().map(|r| r.key.block).collect();
        let ids: Vec<u32> = rows.iter().map(|r| r.slot as u32).collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(locations)),
            Arc::new(UInt32Array::from(blocks)),
            Arc::new(UInt32Array::from(ids)),
        ];

        for field in MEASUREMENT_FIELDS {
            let values: Vec<f64> = rows.iter().map(|r| r.record.value(field)).collect();
            columns.push(Arc::new(Float64Array::from(values)));
        }

        columns.push(Arc::new(Int64Array::from(
            rows.iter().map(|r| r.record.day_index).collect::<Vec<_>>(),
        )));
        columns.push(Arc::new(Int32Array::from(
            rows.iter().map(|r| r.record.year).collect::<Vec<_>>(),
        )));
        columns.push(Arc::new(UInt32Array::from(
            rows.iter().map(|r| r.record.month).collect::<Vec<_>>(),
        )));
        columns.push(Arc::new(Int64Array::from(
            rows.iter().map(|r| r.record.location_hash).collect::<Vec<_>>(),
        )));

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Read a processed dataset back into blocks.
    pub fn read_blocks(&self, path: &Path) -> Result<Vec<Block>> {
        Ok(rows_to_blocks(self.read_rows(path)?))
    }

    pub fn read_rows(&self, path: &Path) -> Result<Vec<ProcessedRow>> {
        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(DEFAULT_BATCH_SIZE)
            .build()?;

        let mut rows = Vec::new();
        for batch_result in parquet_reader {
            let batch = batch_result?;
            batch_to_rows(&batch, &mut rows)?;
        }

        Ok(rows)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        let mut compression = self.compression;
        for i in 0..row_groups {
            let rg_metadata = metadata.row_group(i);
            row_group_sizes.push(rg_metadata.num_rows());
            if rg_metadata.num_columns() > 0 {
                compression = rg_metadata.column(0).compression();
            }
        }

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ProcessingError::schema(format!("processed dataset lacks column {}", name)))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ProcessingError::schema(format!("Invalid {} column type", name)))
}

fn batch_to_rows(batch: &RecordBatch, rows: &mut Vec<ProcessedRow>) -> Result<()> {
    let locations = column::<StringArray>(batch, LOCATION_COLUMN)?;
    let blocks = column::<UInt32Array>(batch, BLOCK_COLUMN)?;
    let ids = column::<UInt32Array>(batch, ID_COLUMN)?;
    let measurements = MEASUREMENT_FIELDS
        .iter()
        .map(|f| column::<Float64Array>(batch, f.column_name()))
        .collect::<Result<Vec<_>>>()?;
    let day_indices = column::<Int64Array>(batch, FeatureField::DayIndex.column_name())?;
    let years = column::<Int32Array>(batch, FeatureField::Year.column_name())?;
    let months = column::<UInt32Array>(batch, FeatureField::Month.column_name())?;
    let hashes = column::<Int64Array>(batch, FeatureField::LocationHash.column_name())?;

    rows.reserve(batch.num_rows());
    for i in 0..batch.num_rows() {
        let mut values = [0.0f64; 14];
        for (value, array) in values.iter_mut().zip(measurements.iter()) {
            *value = array.value(i);
        }

        let location = locations.value(i);
        let record = ObservationRecordBuilder::new()
            .location(location)
            .measurements(Measurements::from_array(values))
            .day_index(day_indices.value(i))
            .calendar(years.value(i), months.value(i))
            .location_hash(hashes.value(i))
            .build()?;

        rows.push(ProcessedRow::from(SegmentedRecord {
            key: BlockKey::new(location, blocks.value(i)),
            slot: ids.value(i) as usize,
            record,
        }));
    }

    Ok(())
}

/// Number of retained blocks per location, sorted by location name.
pub fn blocks_per_location(blocks: &[Block]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for block in blocks {
        *counts.entry(block.location().to_string()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
            avg_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::days;
    use crate::processors::{Purger, Segmenter};
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn sample_blocks() -> Vec<Block> {
        let mut records = days("Albury", 1..=9);
        records.extend(days("Sydney", 20..=25));
        let blocks = Segmenter::new(3).unwrap().segment(&records).blocks;
        Purger::new(3).purge(blocks).retained
    }

    #[test]
    fn test_schema_columns() {
        let schema = ParquetWriter::create_schema();
        assert_eq!(schema.fields().len(), 21);
        assert_eq!(schema.field(0).name(), "Location");
        assert_eq!(schema.field(2).name(), "Id");
        assert_eq!(schema.field(20).name(), "LocationHash");
    }

    #[test]
    fn test_write_and_read_blocks() -> Result<()> {
        let blocks = sample_blocks();
        let temp_file = NamedTempFile::new()?;

        ParquetWriter::new().write_blocks_batched(&blocks, temp_file.path(), 4)?;
        let restored = ParquetWriter::new().read_blocks(temp_file.path())?;

        assert_eq!(restored, blocks);
        Ok(())
    }

    #[test]
    fn test_measurement_columns_carry_record_values() -> Result<()> {
        let blocks = sample_blocks();
        let rows: Vec<SegmentedRecord> =
            blocks.iter().flat_map(Block::segmented_records).collect();

        let batch = ParquetWriter::rows_to_batch(&rows, ParquetWriter::create_schema())?;

        for field in MEASUREMENT_FIELDS {
            let column = super::column::<Float64Array>(&batch, field.column_name())?;
            for (i, row) in rows.iter().enumerate() {
                assert_eq!(column.value(i), row.record.value(field));
            }
        }
        let ids = super::column::<UInt32Array>(&batch, "Id")?;
        assert_eq!(ids.value(4), 1);
        Ok(())
    }

    #[test]
    fn test_write_empty_blocks() -> Result<()> {
        let temp_file = NamedTempFile::new()?;

        ParquetWriter::new().write_blocks(&[], temp_file.path())?;

        assert!(ParquetWriter::new().read_blocks(temp_file.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        let compressions = ["snappy", "gzip", "lz4", "zstd", "none"];
        let blocks = sample_blocks();

        for compression in &compressions {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_blocks(&blocks, temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(ParquetWriter::new().with_compression("brotli9000").is_err());
        Ok(())
    }

    #[test]
    fn test_file_info() -> Result<()> {
        let blocks = sample_blocks();
        let temp_file = NamedTempFile::new()?;

        ParquetWriter::new()
            .with_row_group_size(6)
            .write_blocks(&blocks, temp_file.path())?;
        let info = ParquetWriter::new().get_file_info(temp_file.path())?;

        assert_eq!(info.total_rows, 15);
        assert_eq!(info.row_group_sizes.iter().sum::<i64>(), 15);
        assert!(info.summary().contains("Total rows: 15"));
        Ok(())
    }

    #[test]
    fn test_blocks_per_location() {
        let counts = blocks_per_location(&sample_blocks());
        assert_eq!(counts.get("Albury"), Some(&3));
        assert_eq!(counts.get("Sydney"), Some(&2));
    }
}
