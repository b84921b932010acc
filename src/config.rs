use crate::dashboard::Locale;
use crate::error::Result;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_STATIONS,
    DEFAULT_TABLE_ROWS, ENV_PREFIX,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Dashboard settings, layered from defaults, an optional TOML file and `AQD_*` variables.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub data_path: String,

    pub locale: Locale,

    /// Stations given a correlation matrix when none are requested explicitly
    #[validate(length(min = 1))]
    pub correlation_stations: Vec<String>,

    /// Rows shown by the data table view
    #[validate(range(min = 1, max = 10000))]
    pub table_rows: usize,

    pub compression: String,

    #[validate(length(min = 1))]
    pub output_dir: String,
}

impl Settings {
    /// Load settings from `path` (or `aq-dashboard.toml` in the working directory when absent)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = config::Config::builder()
            .set_default("data_path", DEFAULT_DATA_FILE)?
            .set_default("locale", "english")?
            .set_default(
                "correlation_stations",
                DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            )?
            .set_default("table_rows", DEFAULT_TABLE_ROWS as i64)?
            .set_default("compression", COMPRESSION_SNAPPY)?
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("correlation_stations"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_path)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_overrides_defaults() -> Result<()> {
        let file = toml_file(
            "data_path = \"data/beijing.csv\"\n\
             locale = \"indonesian\"\n\
             correlation_stations = [\"Gucheng\"]\n\
             table_rows = 5\n",
        );

        let settings = Settings::load(Some(file.path()))?;

        assert_eq!(settings.data_path, "data/beijing.csv");
        assert_eq!(settings.locale, Locale::Indonesian);
        assert_eq!(settings.correlation_stations, vec!["Gucheng".to_string()]);
        assert_eq!(settings.table_rows, 5);
        assert_eq!(settings.compression, "snappy");
        assert_eq!(settings.output_dir(), PathBuf::from("output"));

        Ok(())
    }

    #[test]
    fn test_validation_rejects_empty_station_list() {
        let file = toml_file("correlation_stations = []\n");
        let result = Settings::load(Some(file.path()));
        assert!(matches!(result, Err(AnalysisError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_zero_rows() {
        let file = toml_file("table_rows = 0\n");
        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = Settings::load(Some(Path::new("/nonexistent/aq-dashboard.toml")));
        assert!(matches!(result, Err(AnalysisError::ConfigSource(_))));
    }
}
