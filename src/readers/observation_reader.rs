use crate::error::{AnalysisError, Result};
use crate::models::{Measure, Observation};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, MISSING_VALUE_MARKERS, STATION_COLUMN, YEAR_COLUMN};
use csv::StringRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Positions of the required columns within a CSV header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    year: usize,
    station: usize,
    measures: [usize; 7],
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| AnalysisError::UnknownColumn {
                    column: name.to_string(),
                })
        };

        let year = find(YEAR_COLUMN)?;
        let station = find(STATION_COLUMN)?;
        let mut measures = [0usize; 7];
        for (slot, measure) in measures.iter_mut().zip(Measure::ALL) {
            *slot = find(measure.column_name())?;
        }

        Ok(Self {
            year,
            station,
            measures,
        })
    }
}

pub struct ObservationReader {
    delimiter: u8,
    skip_invalid_rows: bool,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            skip_invalid_rows: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Drop rows that fail to parse instead of aborting the whole load
    pub fn with_skip_invalid_rows(mut self, skip: bool) -> Self {
        self.skip_invalid_rows = skip;
        self
    }

    /// Read every observation from a CSV file on disk
    pub fn read_observations(&self, path: &Path) -> Result<Vec<Observation>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let observations = self.read_from(reader)?;

        info!(
            path = %path.display(),
            rows = observations.len(),
            "Loaded air quality observations"
        );
        Ok(observations)
    }

    /// Read observations from any CSV source with a header row
    pub fn read_from<R: Read>(&self, source: R) -> Result<Vec<Observation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(source);

        let layout = ColumnLayout::from_headers(csv_reader.headers()?)?;
        let mut observations = Vec::new();
        let mut skipped = 0usize;

        for (index, record_result) in csv_reader.records().enumerate() {
            // Header is line 1
            let line = index + 2;
            let record = record_result?;

            match self.parse_record(&record, &layout, line) {
                Ok(observation) => observations.push(observation),
                Err(e) if self.skip_invalid_rows => {
                    debug!(line, error = %e, "Skipping unparsable row");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if skipped > 0 {
            info!(skipped, "Skipped invalid rows while loading observations");
        }

        Ok(observations)
    }

    fn parse_record(
        &self,
        record: &StringRecord,
        layout: &ColumnLayout,
        line: usize,
    ) -> Result<Observation> {
        let field = |index: usize| record.get(index).unwrap_or("").trim();

        let year = parse_year(field(layout.year)).ok_or_else(|| {
            AnalysisError::InvalidFormat(format!(
                "line {}: invalid {} '{}'",
                line,
                YEAR_COLUMN,
                field(layout.year)
            ))
        })?;

        let station = field(layout.station);
        if station.is_empty() {
            return Err(AnalysisError::InvalidFormat(format!(
                "line {}: empty {}",
                line, STATION_COLUMN
            )));
        }

        let mut builder = Observation::builder().year(year).station(station);
        for (measure, index) in Measure::ALL.into_iter().zip(layout.measures) {
            let raw = field(index);
            let value = parse_measurement(raw).map_err(|_| {
                AnalysisError::InvalidFormat(format!(
                    "line {}: invalid {} value '{}'",
                    line,
                    measure.column_name(),
                    raw
                ))
            })?;
            builder = builder.measure(measure, value);
        }

        builder.build()
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a year written either as an integer or an integral float (`2013.0`)
fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }

    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// Parse a measurement cell; empty and NA markers become `None`
fn parse_measurement(raw: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    if raw.is_empty()
        || MISSING_VALUE_MARKERS
            .iter()
            .any(|marker| raw.eq_ignore_ascii_case(marker))
    {
        return Ok(None);
    }

    raw.parse::<f64>().map(|v| if v.is_nan() { None } else { Some(v) })
}
