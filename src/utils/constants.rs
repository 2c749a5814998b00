/// Day zero of the `DayIndex` column
pub const DAY_INDEX_EPOCH: (i32, u32, u32) = (2000, 1, 1);

/// Raw date formats, tried in order
pub const RAW_DATE_FORMATS: [&str; 2] = ["%d-%m-%Y", "%Y-%m-%d"];

/// Markers for a missing value in raw observation files
pub const MISSING_VALUE_MARKERS: [&str; 3] = ["", "NA", "nan"];

/// Raw columns that never enter the record table
pub const DROPPED_RAW_COLUMNS: [&str; 7] = [
    "Sunshine",
    "Evaporation",
    "WindGustDir",
    "WindDir9am",
    "WindDir3pm",
    "RainToday",
    "RainTomorrow",
];

/// Processed dataset index columns
pub const LOCATION_COLUMN: &str = "Location";
pub const BLOCK_COLUMN: &str = "Block";
pub const ID_COLUMN: &str = "Id";
pub const DATE_COLUMN: &str = "Date";

/// Pipeline defaults
pub const DEFAULT_FEATURE_DAYS: usize = 13;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_RANDOM_SEED: u64 = 42;
pub const CONFIG_ENV_PREFIX: &str = "WEATHER_WINDOWER";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BATCH_SIZE: usize = 8192;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
