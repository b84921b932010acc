/// Column names that are not measures
pub const YEAR_COLUMN: &str = "year";
pub const STATION_COLUMN: &str = "station";

/// Cell contents treated as a missing measurement
pub const MISSING_VALUE_MARKERS: [&str; 4] = ["NA", "N/A", "NaN", "null"];

/// Stations shown by the correlation view when none are configured
pub const DEFAULT_STATIONS: [&str; 3] = ["Changping", "Gucheng", "Nongzhanguan"];

/// File names
pub const DEFAULT_DATA_FILE: &str = "dashboard/air_quality_df.csv";
pub const DEFAULT_CONFIG_FILE: &str = "aq-dashboard";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Environment variable prefix for settings overrides (AQD_DATA_PATH, ...)
pub const ENV_PREFIX: &str = "AQD";

/// Processing defaults
pub const DEFAULT_TABLE_ROWS: usize = 20;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
