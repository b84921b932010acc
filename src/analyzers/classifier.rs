//! Threshold classification of PM2.5 concentrations.
//!
//! This is a fixed bucket lookup, not a learned clustering: the same input
//! always lands in the same category.

use crate::analyzers::aggregator::trend_by_year_and_station;
use crate::error::{AnalysisError, Result};
use crate::models::{AggregateRecord, AirQualityCategory, Observation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An aggregate paired with the category of its PM2.5 mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub record: AggregateRecord,
    pub category: AirQualityCategory,
}

impl ClassifiedRecord {
    pub fn pm25(&self) -> f64 {
        // Classification only succeeds for records with a PM2.5 mean
        self.record.pm25.unwrap_or(f64::NAN)
    }
}

/// Map a PM2.5 concentration (µg/m³) to its air-quality category.
///
/// Upper bounds are inclusive, so exactly 15.0 is `Excellent`. There is no
/// lower bound; NaN is rejected.
pub fn classify(pm25: f64) -> Result<AirQualityCategory> {
    if pm25.is_nan() {
        return Err(AnalysisError::InvalidMeasurement(
            "PM2.5 value is not a number".to_string(),
        ));
    }

    let category = AirQualityCategory::ALL
        .into_iter()
        .find(|c| c.upper_bound().map_or(true, |upper| pm25 <= upper))
        .unwrap_or(AirQualityCategory::SeverelyPolluted);

    Ok(category)
}

/// Classify each record by its PM2.5 mean, failing on the first record without one.
pub fn classify_aggregates(records: &[AggregateRecord]) -> Result<Vec<ClassifiedRecord>> {
    records
        .iter()
        .map(|record| {
            let pm25 = record.pm25.ok_or_else(|| {
                AnalysisError::InvalidMeasurement(format!(
                    "no PM2.5 mean for {}",
                    record.group_label()
                ))
            })?;

            Ok(ClassifiedRecord {
                record: record.clone(),
                category: classify(pm25)?,
            })
        })
        .collect()
}

/// Yearly PM2.5 classification for a single station.
///
/// Years in which the station reported no PM2.5 at all are left out.
pub fn classify_station_trend(observations: &[Observation], station: &str) -> Result<Vec<ClassifiedRecord>> {
    let station_trend: Vec<AggregateRecord> = trend_by_year_and_station(observations)
        .into_iter()
        .filter(|r| r.station == station)
        .collect();

    if station_trend.is_empty() {
        return Err(AnalysisError::StationNotFound {
            station: station.to_string(),
        });
    }

    let (classifiable, unclassified): (Vec<_>, Vec<_>) =
        station_trend.into_iter().partition(|r| r.pm25.is_some());

    for record in &unclassified {
        debug!(group = %record.group_label(), "Leaving year without PM2.5 unclassified");
    }

    classify_aggregates(&classifiable)
}

/// Display color for a category, as a hex RGB string.
///
/// Used only when rendering; classification never depends on it.
pub fn category_color(category: AirQualityCategory) -> &'static str {
    match category {
        AirQualityCategory::Excellent => "#2E91E5",
        AirQualityCategory::Good => "#57C4AD",
        AirQualityCategory::LightlyPolluted => "#FFC300",
        AirQualityCategory::ModeratelyPolluted => "#FF5733",
        AirQualityCategory::HeavilyPolluted => "#C70039",
        AirQualityCategory::SeverelyPolluted => "#4A0D25",
    }
}
