use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::FeatureField;

/// One day of weather data for one location, as it appears in a record table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct ObservationRecord {
    #[validate(length(min = 1))]
    pub location: String,

    pub min_temp: f64,
    pub max_temp: f64,

    #[validate(range(min = 0.0))]
    pub rainfall: f64,

    #[validate(range(min = 0.0))]
    pub wind_gust_speed: f64,

    #[validate(range(min = 0.0))]
    pub wind_speed_9am: f64,

    #[validate(range(min = 0.0))]
    pub wind_speed_3pm: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_9am: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_3pm: f64,

    pub pressure_9am: f64,
    pub pressure_3pm: f64,

    // Oktas
    #[validate(range(min = 0.0, max = 9.0))]
    pub cloud_9am: f64,

    #[validate(range(min = 0.0, max = 9.0))]
    pub cloud_3pm: f64,

    pub temp_9am: f64,
    pub temp_3pm: f64,

    pub day_index: i64,
    pub year: i32,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    pub location_hash: i64,
}

impl ObservationRecord {
    /// Numeric value of one column, widened to `f64`.
    pub fn value(&self, field: FeatureField) -> f64 {
        match field {
            FeatureField::MinTemp => self.min_temp,
            FeatureField::MaxTemp => self.max_temp,
            FeatureField::Rainfall => self.rainfall,
            FeatureField::WindGustSpeed => self.wind_gust_speed,
            FeatureField::WindSpeed9am => self.wind_speed_9am,
            FeatureField::WindSpeed3pm => self.wind_speed_3pm,
            FeatureField::Humidity9am => self.humidity_9am,
            FeatureField::Humidity3pm => self.humidity_3pm,
            FeatureField::Pressure9am => self.pressure_9am,
            FeatureField::Pressure3pm => self.pressure_3pm,
            FeatureField::Cloud9am => self.cloud_9am,
            FeatureField::Cloud3pm => self.cloud_3pm,
            FeatureField::Temp9am => self.temp_9am,
            FeatureField::Temp3pm => self.temp_3pm,
            FeatureField::DayIndex => self.day_index as f64,
            FeatureField::Year => self.year as f64,
            FeatureField::Month => self.month as f64,
            FeatureField::LocationHash => self.location_hash as f64,
        }
    }

    /// Append the given fields, in order, to `out`.
    pub fn extend_values(&self, fields: &[FeatureField], out: &mut Vec<f64>) {
        out.extend(fields.iter().map(|&field| self.value(field)));
    }

    pub fn values(&self, fields: &[FeatureField]) -> Vec<f64> {
        let mut out = Vec::with_capacity(fields.len());
        self.extend_values(fields, &mut out);
        out
    }

    pub fn follows(&self, previous: &ObservationRecord) -> bool {
        self.day_index == previous.day_index + 1
    }
}

/// Measurement values in table order, as set on [`ObservationRecordBuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub min_temp: f64,
    pub max_temp: f64,
    pub rainfall: f64,
    pub wind_gust_speed: f64,
    pub wind_speed_9am: f64,
    pub wind_speed_3pm: f64,
    pub humidity_9am: f64,
    pub humidity_3pm: f64,
    pub pressure_9am: f64,
    pub pressure_3pm: f64,
    pub cloud_9am: f64,
    pub cloud_3pm: f64,
    pub temp_9am: f64,
    pub temp_3pm: f64,
}

impl Measurements {
    pub fn from_array(values: [f64; 14]) -> Self {
        Self {
            min_temp: values[0],
            max_temp: values[1],
            rainfall: values[2],
            wind_gust_speed: values[3],
            wind_speed_9am: values[4],
            wind_speed_3pm: values[5],
            humidity_9am: values[6],
            humidity_3pm: values[7],
            pressure_9am: values[8],
            pressure_3pm: values[9],
            cloud_9am: values[10],
            cloud_3pm: values[11],
            temp_9am: values[12],
            temp_3pm: values[13],
        }
    }
}

#[derive(Default)]
pub struct ObservationRecordBuilder {
    location: Option<String>,
    measurements: Option<Measurements>,
    day_index: Option<i64>,
    year: Option<i32>,
    month: Option<u32>,
    location_hash: Option<i64>,
}

impl ObservationRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn measurements(mut self, measurements: Measurements) -> Self {
        self.measurements = Some(measurements);
        self
    }

    pub fn day_index(mut self, day_index: i64) -> Self {
        self.day_index = Some(day_index);
        self
    }

    pub fn calendar(mut self, year: i32, month: u32) -> Self {
        self.year = Some(year);
        self.month = Some(month);
        self
    }

    pub fn location_hash(mut self, code: i64) -> Self {
        self.location_hash = Some(code);
        self
    }

    pub fn build(self) -> Result<ObservationRecord> {
        let m = self
            .measurements
            .ok_or_else(|| ProcessingError::schema("missing measurements"))?;

        let record = ObservationRecord {
            location: self
                .location
                .ok_or_else(|| ProcessingError::schema("missing Location"))?,
            min_temp: m.min_temp,
            max_temp: m.max_temp,
            rainfall: m.rainfall,
            wind_gust_speed: m.wind_gust_speed,
            wind_speed_9am: m.wind_speed_9am,
            wind_speed_3pm: m.wind_speed_3pm,
            humidity_9am: m.humidity_9am,
            humidity_3pm: m.humidity_3pm,
            pressure_9am: m.pressure_9am,
            pressure_3pm: m.pressure_3pm,
            cloud_9am: m.cloud_9am,
            cloud_3pm: m.cloud_3pm,
            temp_9am: m.temp_9am,
            temp_3pm: m.temp_3pm,
            day_index: self
                .day_index
                .ok_or_else(|| ProcessingError::schema("missing DayIndex"))?,
            year: self
                .year
                .ok_or_else(|| ProcessingError::schema("missing Year"))?,
            month: self
                .month
                .ok_or_else(|| ProcessingError::schema("missing Month"))?,
            location_hash: self
                .location_hash
                .ok_or_else(|| ProcessingError::schema("missing LocationHash"))?,
        };

        record.validate()?;
        Ok(record)
    }
}
