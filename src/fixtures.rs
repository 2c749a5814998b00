//! Record builders shared by unit tests.

use std::ops::RangeInclusive;

use crate::models::{Measurements, ObservationRecord, ObservationRecordBuilder};

/// A record whose measurements are derived from its day so that vectors
/// built from different days are distinguishable.
pub fn record(location: &str, day_index: i64) -> ObservationRecord {
    let d = day_index as f64;
    ObservationRecordBuilder::new()
        .location(location)
        .measurements(Measurements::from_array([
            10.0 + d,
            20.0 + d,
            (d % 5.0).abs(),
            30.0,
            10.0,
            15.0,
            60.0,
            40.0,
            1015.0,
            1012.0,
            (d % 9.0).abs(),
            1.0,
            14.0 + d,
            19.0 + d,
        ]))
        .day_index(day_index)
        .calendar(2000, 1)
        .location_hash(location.len() as i64)
        .build()
        .expect("fixture record is valid")
}

pub fn days(location: &str, range: RangeInclusive<i64>) -> Vec<ObservationRecord> {
    range.map(|d| record(location, d)).collect()
}
