use crate::analyzers::aggregator::{available_years, stations};
use crate::error::{AnalysisError, Result};
use crate::models::{MeanAccumulator, Measure, Observation};

#[derive(Debug)]
pub struct DatasetStatistics {
    pub total_records: usize,
    pub stations: Vec<String>,
    pub year_range: (i32, i32),
    pub pm25_stats: Pm25Stats,
    pub data_quality: DataQuality,
}

#[derive(Debug)]
pub struct Pm25Stats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub min_location: String,
    pub max_location: String,
}

#[derive(Debug)]
pub struct DataQuality {
    pub total_records: usize,
    pub missing_records: usize,
    pub complete_records: usize,
}

impl DataQuality {
    pub fn missing_percentage(&self) -> f64 {
        percentage(self.missing_records, self.total_records)
    }

    pub fn complete_percentage(&self) -> f64 {
        percentage(self.complete_records, self.total_records)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, observations: &[Observation]) -> Result<DatasetStatistics> {
        let years = available_years(observations);
        let (first_year, last_year) = match (years.first(), years.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(AnalysisError::MissingData("No observations to analyze".to_string())),
        };

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut min_location = String::new();
        let mut max_location = String::new();
        let mut mean = MeanAccumulator::default();
        let mut missing_count = 0;
        let mut complete_count = 0;

        for observation in observations {
            if let Some(pm25) = observation.value(Measure::Pm25).filter(|v| !v.is_nan()) {
                if pm25 < min {
                    min = pm25;
                    min_location = format!("{} ({})", observation.station, observation.year);
                }
                if pm25 > max {
                    max = pm25;
                    max_location = format!("{} ({})", observation.station, observation.year);
                }
            }
            mean.push(observation.value(Measure::Pm25));

            if observation.has_missing_data() {
                missing_count += 1;
            }
            if observation.is_complete() {
                complete_count += 1;
            }
        }

        if min == f64::INFINITY {
            min = f64::NAN;
            min_location = "No valid measurements".to_string();
        }
        if max == f64::NEG_INFINITY {
            max = f64::NAN;
            max_location = "No valid measurements".to_string();
        }

        Ok(DatasetStatistics {
            total_records: observations.len(),
            stations: stations(observations),
            year_range: (first_year, last_year),
            pm25_stats: Pm25Stats {
                min,
                max,
                avg: mean.mean().unwrap_or(f64::NAN),
                min_location,
                max_location,
            },
            data_quality: DataQuality {
                total_records: observations.len(),
                missing_records: missing_count,
                complete_records: complete_count,
            },
        })
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStatistics {
    pub fn summary(&self) -> String {
        let pm25_range = if self.pm25_stats.min.is_nan() || self.pm25_stats.max.is_nan() {
            "No valid measurements".to_string()
        } else {
            format!("{:.1} to {:.1} µg/m³", self.pm25_stats.min, self.pm25_stats.max)
        };

        format!(
            "Measures: PM2.5, PM10, NO2, O3, TEMP, DEWP, RAIN\n\
            Stations: {} ({})\n\
            Years: {} to {}\n\
            Records: {} total\n\
            Data Quality: {:.1}% with missing values\n\
            PM2.5 Range: {}",
            self.stations.len(),
            self.stations.join(", "),
            self.year_range.0,
            self.year_range.1,
            self.total_records,
            self.data_quality.missing_percentage(),
            pm25_range
        )
    }

    pub fn detailed_summary(&self) -> String {
        let describe = |value: f64, location: &str| {
            if value.is_nan() {
                "No valid measurements".to_string()
            } else {
                format!("{:.1} µg/m³ at {}", value, location)
            }
        };

        let average = if self.pm25_stats.avg.is_nan() {
            "No valid measurements".to_string()
        } else {
            format!("{:.1} µg/m³", self.pm25_stats.avg)
        };

        format!(
            "{}\n\n\
            PM2.5 Extremes:\n\
            - Cleanest: {}\n\
            - Most polluted: {}\n\
            - Average: {}\n\n\
            Data Completeness:\n\
            - Complete records: {}/{} ({:.1}%)",
            self.summary(),
            describe(self.pm25_stats.min, &self.pm25_stats.min_location),
            describe(self.pm25_stats.max, &self.pm25_stats.max_location),
            average,
            self.data_quality.complete_records,
            self.data_quality.total_records,
            self.data_quality.complete_percentage()
        )
    }
}
