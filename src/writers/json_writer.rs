use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize any table of records as a JSON array
    pub fn write_records<T: Serialize>(&self, records: &[T], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, records)?;
        } else {
            serde_json::to_writer(&mut writer, records)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(path = %path.display(), rows = records.len(), "Wrote JSON table");
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregator::average_by_station;
    use crate::models::{AggregateRecord, Observation};
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_station_averages() -> Result<()> {
        let observations = vec![
            Observation::builder().year(2013).station("Gucheng").pm25(42.0).build()?,
            Observation::builder().year(2014).station("Gucheng").pm25(58.0).build()?,
        ];
        let averages: Vec<AggregateRecord> = average_by_station(&observations).into_values().collect();

        let temp_file = NamedTempFile::new()?;
        JsonWriter::new().with_pretty(false).write_records(&averages, temp_file.path())?;

        let contents = std::fs::read_to_string(temp_file.path())?;
        let parsed: Vec<AggregateRecord> = serde_json::from_str(&contents)?;

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].station, "Gucheng");
        assert_eq!(parsed[0].pm25, Some(50.0));
        assert_eq!(parsed[0].pm10, None);
        assert!(contents.contains("\"pm10\":null"));

        Ok(())
    }
}
