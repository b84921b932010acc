use crate::models::{Measure, Observation};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct CompletenessReport {
    pub total_records: usize,
    pub complete_records: usize,
    pub missing_by_measure: BTreeMap<Measure, usize>,
    pub station_statistics: BTreeMap<String, StationStatistics>,
    /// `(year, station)` groups with no PM2.5 reading at all; these cannot be classified
    pub unclassifiable_groups: Vec<(i32, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct StationStatistics {
    pub total_records: usize,
    pub complete_records: usize,
    pub missing_by_measure: BTreeMap<Measure, usize>,
    pub min_pm25: Option<f64>,
    pub max_pm25: Option<f64>,
}

impl StationStatistics {
    pub fn missing(&self, measure: Measure) -> usize {
        self.missing_by_measure.get(&measure).copied().unwrap_or(0)
    }
}

impl CompletenessReport {
    pub fn missing(&self, measure: Measure) -> usize {
        self.missing_by_measure.get(&measure).copied().unwrap_or(0)
    }

    pub fn missing_percentage(&self, measure: Measure) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        100.0 * self.missing(measure) as f64 / self.total_records as f64
    }
}

pub struct CompletenessChecker {
    measures: Vec<Measure>,
}

impl CompletenessChecker {
    pub fn new() -> Self {
        Self {
            measures: Measure::ALL.to_vec(),
        }
    }

    /// Restrict the report to a subset of measures
    pub fn with_measures(measures: &[Measure]) -> Self {
        Self {
            measures: measures.to_vec(),
        }
    }

    /// Count missing readings overall, per measure and per station
    pub fn check(&self, observations: &[Observation]) -> CompletenessReport {
        let mut report = CompletenessReport {
            total_records: observations.len(),
            complete_records: 0,
            missing_by_measure: self.measures.iter().map(|m| (*m, 0)).collect(),
            station_statistics: BTreeMap::new(),
            unclassifiable_groups: Vec::new(),
        };

        let mut groups_with_pm25: BTreeSet<(i32, &str)> = BTreeSet::new();
        let mut all_groups: BTreeSet<(i32, &str)> = BTreeSet::new();

        for observation in observations {
            let stats = report
                .station_statistics
                .entry(observation.station.clone())
                .or_default();
            stats.total_records += 1;

            let mut complete = true;
            for measure in &self.measures {
                if observation.value(*measure).is_none() {
                    complete = false;
                    *report.missing_by_measure.entry(*measure).or_default() += 1;
                    *stats.missing_by_measure.entry(*measure).or_default() += 1;
                }
            }

            if complete {
                report.complete_records += 1;
                stats.complete_records += 1;
            }

            let key = (observation.year, observation.station.as_str());
            all_groups.insert(key);
            if let Some(pm25) = observation.pm25 {
                groups_with_pm25.insert(key);
                stats.min_pm25 = Some(stats.min_pm25.map_or(pm25, |v| v.min(pm25)));
                stats.max_pm25 = Some(stats.max_pm25.map_or(pm25, |v| v.max(pm25)));
            }
        }

        report.unclassifiable_groups = all_groups
            .difference(&groups_with_pm25)
            .map(|(year, station)| (*year, station.to_string()))
            .collect();

        report
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &CompletenessReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Completeness Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Complete Records: {} ({:.1}%)\n",
            report.complete_records,
            percentage(report.complete_records, report.total_records)
        ));

        summary.push_str("\nMissing values by measure:\n");
        for measure in &self.measures {
            summary.push_str(&format!(
                "  {:<6} {:>8} ({:.1}%)\n",
                measure.column_name(),
                report.missing(*measure),
                report.missing_percentage(*measure)
            ));
        }

        summary.push_str("\nStations:\n");
        for (station, stats) in &report.station_statistics {
            let pm25_range = match (stats.min_pm25, stats.max_pm25) {
                (Some(min), Some(max)) => format!("PM2.5 {:.1}-{:.1}", min, max),
                _ => "no PM2.5 readings".to_string(),
            };
            summary.push_str(&format!(
                "  {}: {} records, {:.1}% complete, {}\n",
                station,
                stats.total_records,
                percentage(stats.complete_records, stats.total_records),
                pm25_range
            ));
        }

        if !report.unclassifiable_groups.is_empty() {
            summary.push_str(&format!(
                "\nUnclassifiable station-years (no PM2.5): {}\n",
                report.unclassifiable_groups.len()
            ));
            for (year, station) in report.unclassifiable_groups.iter().take(10) {
                summary.push_str(&format!("  - {} {}\n", station, year));
            }
        }

        summary
    }
}

impl Default for CompletenessChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
