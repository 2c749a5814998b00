use csv::StringRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::ObservationRecord;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;

/// Columns every record table must carry. Extra columns are ignored.
pub const RECORD_TABLE_COLUMNS: [&str; 19] = [
    "Location",
    "MinTemp",
    "MaxTemp",
    "Rainfall",
    "WindGustSpeed",
    "WindSpeed9am",
    "WindSpeed3pm",
    "Humidity9am",
    "Humidity3pm",
    "Pressure9am",
    "Pressure3pm",
    "Cloud9am",
    "Cloud3pm",
    "Temp9am",
    "Temp3pm",
    "DayIndex",
    "Year",
    "Month",
    "LocationHash",
];

/// Reads a fully populated record table from CSV.
pub struct RecordTableReader {
    validate_ranges: bool,
}

impl RecordTableReader {
    pub fn new() -> Self {
        Self {
            validate_ranges: true,
        }
    }

    pub fn with_validate_ranges(validate_ranges: bool) -> Self {
        Self { validate_ranges }
    }

    pub fn read_records(&self, path: &Path) -> Result<Vec<ObservationRecord>> {
        let file = File::open(path)?;
        self.read_from(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<ObservationRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        check_headers(csv_reader.headers()?)?;

        let mut records = Vec::new();
        for result in csv_reader.deserialize::<ObservationRecord>() {
            let record = result.map_err(schema_or_csv)?;
            if self.validate_ranges {
                record.validate()?;
            }
            records.push(record);
        }

        Ok(records)
    }
}

impl Default for RecordTableReader {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_headers(headers: &StringRecord) -> Result<()> {
    let missing: Vec<&str> = RECORD_TABLE_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ProcessingError::schema(format!(
            "record table is missing column(s): {}",
            missing.join(", ")
        )))
    }
}

/// Type mismatches in a row are schema errors; everything else stays a CSV error.
pub(crate) fn schema_or_csv(err: csv::Error) -> ProcessingError {
    if matches!(err.kind(), csv::ErrorKind::Deserialize { .. }) {
        let line = err
            .position()
            .map(|p| p.line().to_string())
            .unwrap_or_else(|| "?".to_string());
        ProcessingError::schema(format!("line {}: {}", line, err))
    } else {
        ProcessingError::Csv(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Location,MinTemp,MaxTemp,Rainfall,WindGustSpeed,WindSpeed9am,WindSpeed3pm,Humidity9am,Humidity3pm,Pressure9am,Pressure3pm,Cloud9am,Cloud3pm,Temp9am,Temp3pm,DayIndex,Year,Month,LocationHash";

    #[test]
    fn test_read_record_table() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},Extra", HEADER)?;
        writeln!(
            file,
            "Albury,13.4,22.9,0.6,44,20,24,71,22,1007.7,1007.1,8,0,16.9,21.8,3257,2008,12,0,x"
        )?;
        writeln!(
            file,
            "Albury,7.4,25.1,0,44,4,22,44,25,1010.6,1007.8,0,0,17.2,24.3,3258,2008,12,0,y"
        )?;

        let records = RecordTableReader::new().read_records(file.path())?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location, "Albury");
        assert_eq!(records[0].wind_speed_9am, 20.0);
        assert_eq!(records[1].day_index, 3258);
        assert!(records[1].follows(&records[0]));
        Ok(())
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let header = HEADER.replace(",LocationHash", "");
        let data = format!("{}\nAlbury,1,2,0,1,1,1,50,50,1000,1000,1,1,1,1,1,2000,1\n", header);

        let result = RecordTableReader::new().read_from(data.as_bytes());

        match result {
            Err(ProcessingError::Schema { message }) => assert!(message.contains("LocationHash")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_schema_error() {
        let data = format!(
            "{}\nAlbury,1,2,0,1,1,1,50,50,1000,1000,1,1,1,1,not-a-day,2000,1,0\n",
            HEADER
        );

        let result = RecordTableReader::new().read_from(data.as_bytes());

        match result {
            Err(ProcessingError::Schema { message }) => assert!(message.contains("line 2")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_range_validation_can_be_disabled() {
        let data = format!(
            "{}\nAlbury,1,2,0,1,1,1,150,50,1000,1000,1,1,1,1,1,2000,1,0\n",
            HEADER
        );

        assert!(RecordTableReader::new().read_from(data.as_bytes()).is_err());
        assert_eq!(
            RecordTableReader::with_validate_ranges(false)
                .read_from(data.as_bytes())
                .unwrap()
                .len(),
            1
        );
    }
}
