use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ProcessingError, Result};
use crate::models::{FeatureField, Measurements, ObservationRecord, ObservationRecordBuilder, MEASUREMENT_FIELDS};
use crate::utils::constants::{
    DATE_COLUMN, DAY_INDEX_EPOCH, DEFAULT_BUFFER_SIZE, DROPPED_RAW_COLUMNS, LOCATION_COLUMN,
    MISSING_VALUE_MARKERS, RAW_DATE_FORMATS,
};
use crate::utils::locations::{LocationCodes, StationTable};

/// Records derived from a raw observation file, plus how many rows were
/// dropped for missing measurements.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub records: Vec<ObservationRecord>,
    pub skipped_rows: usize,
}

/// Column positions resolved from the raw header.
struct RawColumns {
    date: usize,
    location: usize,
    measurements: [usize; 14],
}

impl RawColumns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                ProcessingError::schema(format!("raw observations lack column {}", name))
            })
        };

        let mut measurements = [0usize; 14];
        for (slot, field) in measurements.iter_mut().zip(MEASUREMENT_FIELDS.iter()) {
            *slot = find(field.column_name())?;
        }

        let dropped: Vec<&str> = headers
            .iter()
            .filter(|h| DROPPED_RAW_COLUMNS.contains(h))
            .collect();
        if !dropped.is_empty() {
            debug!("Ignoring raw columns: {}", dropped.join(", "));
        }

        Ok(Self {
            date: find(DATE_COLUMN)?,
            location: find(LOCATION_COLUMN)?,
            measurements,
        })
    }
}

/// Turns raw daily observations (calendar dates, location names, `NA`
/// holes) into record-table rows.
pub struct RawObservationReader {
    codes: Box<dyn LocationCodes>,
    zero_fill_clouds: bool,
    use_mmap: bool,
}

impl RawObservationReader {
    pub fn new() -> Self {
        Self {
            codes: Box::new(StationTable::australian()),
            zero_fill_clouds: true,
            use_mmap: false,
        }
    }

    pub fn with_codes(mut self, codes: Box<dyn LocationCodes>) -> Self {
        self.codes = codes;
        self
    }

    /// Missing cloud cover reads as 0 oktas instead of dropping the day.
    pub fn with_zero_fill_clouds(mut self, zero_fill_clouds: bool) -> Self {
        self.zero_fill_clouds = zero_fill_clouds;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn read_observations(&self, path: &Path) -> Result<RawTable> {
        let file = File::open(path)?;
        let table = if self.use_mmap {
            let mmap = unsafe { Mmap::map(&file)? };
            self.read_from(&mmap[..])?
        } else {
            self.read_from(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))?
        };

        info!(
            "Read {} observations from {} ({} rows skipped for missing values)",
            table.records.len(),
            path.display(),
            table.skipped_rows
        );
        Ok(table)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<RawTable> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let columns = RawColumns::resolve(csv_reader.headers()?)?;

        let mut table = RawTable::default();
        for result in csv_reader.records() {
            let row = result?;
            let line = row.position().map_or(0, |p| p.line());
            match self.parse_row(&row, &columns, line)? {
                Some(record) => table.records.push(record),
                None => table.skipped_rows += 1,
            }
        }

        Ok(table)
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        columns: &RawColumns,
        line: u64,
    ) -> Result<Option<ObservationRecord>> {
        let field = |index: usize| row.get(index).unwrap_or("");

        let date = parse_raw_date(field(columns.date))?;
        let location = field(columns.location);
        let code = self
            .codes
            .code(location)
            .ok_or_else(|| ProcessingError::UnknownLocation(location.to_string()))?;

        let mut values = [0.0f64; 14];
        for ((value, &index), measurement) in values
            .iter_mut()
            .zip(columns.measurements.iter())
            .zip(MEASUREMENT_FIELDS.iter())
        {
            match parse_measurement(field(index), *measurement, line)? {
                Some(v) => *value = v,
                None if self.zero_fill_clouds && is_cloud(*measurement) => *value = 0.0,
                None => {
                    debug!(line, column = %measurement, "skipping row with missing value");
                    return Ok(None);
                }
            }
        }

        let record = ObservationRecordBuilder::new()
            .location(location)
            .measurements(Measurements::from_array(values))
            .day_index(day_index(date))
            .calendar(date.year(), date.month())
            .location_hash(code)
            .build()?;

        Ok(Some(record))
    }
}

impl Default for RawObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Days since 2000-01-01.
pub fn day_index(date: NaiveDate) -> i64 {
    let (y, m, d) = DAY_INDEX_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
    date.signed_duration_since(epoch).num_days()
}

pub fn parse_raw_date(value: &str) -> Result<NaiveDate> {
    let mut last_err = None;
    for format in RAW_DATE_FORMATS {
        match NaiveDate::parse_from_str(value, format) {
            Ok(date) => return Ok(date),
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(ProcessingError::DateParse(e)),
        None => Err(ProcessingError::InvalidFormat(format!(
            "Invalid date: '{}'",
            value
        ))),
    }
}

fn parse_measurement(value: &str, field: FeatureField, line: u64) -> Result<Option<f64>> {
    if MISSING_VALUE_MARKERS.contains(&value) {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| {
        ProcessingError::InvalidFormat(format!(
            "line {}: invalid {} value '{}'",
            line, field, value
        ))
    })
}

fn is_cloud(field: FeatureField) -> bool {
    matches!(field, FeatureField::Cloud9am | FeatureField::Cloud3pm)
}
