use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric column of an observation that can enter a feature or target vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureField {
    MinTemp,
    MaxTemp,
    Rainfall,
    WindGustSpeed,
    WindSpeed9am,
    WindSpeed3pm,
    Humidity9am,
    Humidity3pm,
    Pressure9am,
    Pressure3pm,
    Cloud9am,
    Cloud3pm,
    Temp9am,
    Temp3pm,
    DayIndex,
    Year,
    Month,
    LocationHash,
}

/// Measurement columns in table order. This is the default vector layout.
pub const MEASUREMENT_FIELDS: [FeatureField; 14] = [
    FeatureField::MinTemp,
    FeatureField::MaxTemp,
    FeatureField::Rainfall,
    FeatureField::WindGustSpeed,
    FeatureField::WindSpeed9am,
    FeatureField::WindSpeed3pm,
    FeatureField::Humidity9am,
    FeatureField::Humidity3pm,
    FeatureField::Pressure9am,
    FeatureField::Pressure3pm,
    FeatureField::Cloud9am,
    FeatureField::Cloud3pm,
    FeatureField::Temp9am,
    FeatureField::Temp3pm,
];

/// Calendar and location columns carried next to the measurements.
pub const CONTEXT_FIELDS: [FeatureField; 4] = [
    FeatureField::DayIndex,
    FeatureField::Year,
    FeatureField::Month,
    FeatureField::LocationHash,
];

impl FeatureField {
    pub fn column_name(&self) -> &'static str {
        match self {
            FeatureField::MinTemp => "MinTemp",
            FeatureField::MaxTemp => "MaxTemp",
            FeatureField::Rainfall => "Rainfall",
            FeatureField::WindGustSpeed => "WindGustSpeed",
            FeatureField::WindSpeed9am => "WindSpeed9am",
            FeatureField::WindSpeed3pm => "WindSpeed3pm",
            FeatureField::Humidity9am => "Humidity9am",
            FeatureField::Humidity3pm => "Humidity3pm",
            FeatureField::Pressure9am => "Pressure9am",
            FeatureField::Pressure3pm => "Pressure3pm",
            FeatureField::Cloud9am => "Cloud9am",
            FeatureField::Cloud3pm => "Cloud3pm",
            FeatureField::Temp9am => "Temp9am",
            FeatureField::Temp3pm => "Temp3pm",
            FeatureField::DayIndex => "DayIndex",
            FeatureField::Year => "Year",
            FeatureField::Month => "Month",
            FeatureField::LocationHash => "LocationHash",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        MEASUREMENT_FIELDS
            .iter()
            .chain(CONTEXT_FIELDS.iter())
            .copied()
            .find(|field| field.column_name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_measurement(&self) -> bool {
        MEASUREMENT_FIELDS.contains(self)
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
