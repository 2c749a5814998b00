use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::ObservationRecord;
use crate::readers::record_reader::RecordTableReader;
use crate::utils::filename::DatasetFormat;
use crate::utils::locations::{LocationCodes, StationTable};

const DAY_KEY_PREFIX: &str = "Day";
const LOCATION_HASH_KEY: &str = "LocationHash";
const LOCATION_KEY: &str = "Location";

/// Reads the records of a single prediction request.
///
/// JSON payloads are objects keyed `Day0`, `Day1`, ... where each value is a
/// record-table row. A day without `LocationHash` gets it from the station
/// table. CSV payloads are plain record tables.
pub struct PayloadReader {
    codes: Box<dyn LocationCodes>,
}

impl PayloadReader {
    pub fn new() -> Self {
        Self {
            codes: Box::new(StationTable::australian()),
        }
    }

    pub fn with_codes(codes: Box<dyn LocationCodes>) -> Self {
        Self { codes }
    }

    pub fn read_payload(&self, path: &Path) -> Result<Vec<ObservationRecord>> {
        match DatasetFormat::from_path(path) {
            Some(DatasetFormat::Csv) => RecordTableReader::new().read_records(path),
            _ => {
                let text = fs::read_to_string(path)?;
                self.parse_json(&text)
            }
        }
    }

    pub fn parse_json(&self, text: &str) -> Result<Vec<ObservationRecord>> {
        let payload: Value = serde_json::from_str(text)?;
        let days = payload.as_object().ok_or_else(|| {
            ProcessingError::InvalidFormat("payload must be a JSON object of days".to_string())
        })?;

        let mut ordered = Vec::with_capacity(days.len());
        for (key, day) in days {
            ordered.push((day_number(key)?, key.as_str(), day));
        }
        ordered.sort_by_key(|(number, _, _)| *number);

        ordered
            .into_iter()
            .map(|(_, key, day)| self.parse_day(key, day))
            .collect()
    }

    fn parse_day(&self, key: &str, day: &Value) -> Result<ObservationRecord> {
        let mut fields: Map<String, Value> = day.as_object().cloned().ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("{} must be a JSON object", key))
        })?;

        if !fields.contains_key(LOCATION_HASH_KEY) {
            let location = fields
                .get(LOCATION_KEY)
                .and_then(Value::as_str)
                .ok_or_else(|| ProcessingError::schema(format!("{}: missing Location", key)))?;
            let code = self
                .codes
                .code(location)
                .ok_or_else(|| ProcessingError::UnknownLocation(location.to_string()))?;
            debug!("{}: filled LocationHash {} for {}", key, code, location);
            fields.insert(LOCATION_HASH_KEY.to_string(), Value::from(code));
        }

        let record: ObservationRecord = serde_json::from_value(Value::Object(fields))
            .map_err(|e| ProcessingError::schema(format!("{}: {}", key, e)))?;
        record.validate()?;
        Ok(record)
    }
}

impl Default for PayloadReader {
    fn default() -> Self {
        Self::new()
    }
}

fn day_number(key: &str) -> Result<u32> {
    key.strip_prefix(DAY_KEY_PREFIX)
        .and_then(|suffix| suffix.parse::<u32>().ok())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("unexpected payload key '{}'", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(min_temp: f64, day_index: i64) -> Value {
        json!({
            "Location": "Canberra",
            "MinTemp": min_temp, "MaxTemp": 25.0, "Rainfall": 0.0,
            "WindGustSpeed": 30.0, "WindSpeed9am": 5.0, "WindSpeed3pm": 10.0,
            "Humidity9am": 60.0, "Humidity3pm": 40.0,
            "Pressure9am": 1015.0, "Pressure3pm": 1012.0,
            "Cloud9am": 2.0, "Cloud3pm": 4.0, "Temp9am": 15.0, "Temp3pm": 23.0,
            "DayIndex": day_index, "Year": 2010, "Month": 3
        })
    }

    #[test]
    fn test_days_ordered_numerically() -> Result<()> {
        let mut payload = Map::new();
        for i in 0..12 {
            payload.insert(format!("Day{}", i), day(i as f64, 100 + i));
        }
        let text = Value::Object(payload).to_string();

        let records = PayloadReader::new().parse_json(&text)?;

        assert_eq!(records.len(), 12);
        let mins: Vec<f64> = records.iter().map(|r| r.min_temp).collect();
        assert_eq!(mins, (0..12).map(|i| i as f64).collect::<Vec<_>>());
        assert_eq!(records[10].day_index, 110);
        Ok(())
    }

    #[test]
    fn test_location_hash_filled_from_table() -> Result<()> {
        let text = json!({ "Day0": day(1.0, 1) }).to_string();
        let records = PayloadReader::new().parse_json(&text)?;
        assert_eq!(records[0].location_hash, 15);
        Ok(())
    }

    #[test]
    fn test_explicit_location_hash_kept() -> Result<()> {
        let mut d = day(1.0, 1);
        d["LocationHash"] = json!(99);
        let text = json!({ "Day0": d }).to_string();

        let records = PayloadReader::new().parse_json(&text)?;
        assert_eq!(records[0].location_hash, 99);
        Ok(())
    }

    #[test]
    fn test_bad_day_key() {
        let text = json!({ "Tomorrow": day(1.0, 1) }).to_string();
        let result = PayloadReader::new().parse_json(&text);
        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let mut d = day(1.0, 1);
        d.as_object_mut().unwrap().remove("Temp3pm");
        let text = json!({ "Day0": d }).to_string();

        match PayloadReader::new().parse_json(&text) {
            Err(ProcessingError::Schema { message }) => assert!(message.contains("Temp3pm")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
