//! Group-by views over the observation table.
//!
//! Every function here is pure: it borrows the observations, never mutates
//! them, and keeps no state between calls.

use crate::error::{AnalysisError, Result};
use crate::models::{AggregateRecord, CorrelationMatrix, MeanAccumulator, Measure, Observation, StationFilter};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Per-group running means of the four pollutants.
#[derive(Debug, Default)]
struct PollutantGroup {
    observation_count: usize,
    means: [MeanAccumulator; 4],
}

impl PollutantGroup {
    fn push(&mut self, observation: &Observation) {
        self.observation_count += 1;
        for (acc, measure) in self.means.iter_mut().zip(Measure::POLLUTANTS) {
            acc.push(observation.value(measure));
        }
    }

    fn into_record(self, year: Option<i32>, station: String) -> AggregateRecord {
        let [pm25, pm10, no2, o3] = self.means;
        AggregateRecord {
            year,
            station,
            observation_count: self.observation_count,
            pm25: pm25.mean(),
            pm10: pm10.mean(),
            no2: no2.mean(),
            o3: o3.mean(),
        }
    }
}

/// Mean PM2.5, PM10, NO2 and O3 per `(year, station)`, ordered by year then station.
pub fn trend_by_year_and_station(observations: &[Observation]) -> Vec<AggregateRecord> {
    let mut groups: BTreeMap<(i32, &str), PollutantGroup> = BTreeMap::new();

    for observation in observations {
        groups
            .entry((observation.year, observation.station.as_str()))
            .or_default()
            .push(observation);
    }

    debug!(groups = groups.len(), "Computed yearly pollutant trend");

    groups
        .into_iter()
        .map(|((year, station), group)| group.into_record(Some(year), station.to_string()))
        .collect()
}

/// Mean of the four pollutants per station, keyed by station name.
pub fn average_by_station(observations: &[Observation]) -> BTreeMap<String, AggregateRecord> {
    let mut groups: BTreeMap<&str, PollutantGroup> = BTreeMap::new();

    for observation in observations {
        groups
            .entry(observation.station.as_str())
            .or_default()
            .push(observation);
    }

    groups
        .into_iter()
        .map(|(station, group)| (station.to_string(), group.into_record(None, station.to_string())))
        .collect()
}

/// Pearson correlation among all seven measures for one station.
///
/// Each cell uses the rows where both measures are present. Cells whose
/// inputs have fewer than two such rows or a constant series are `None`.
pub fn correlation_by_station(observations: &[Observation], station: &str) -> Result<CorrelationMatrix> {
    let rows: Vec<&Observation> = observations.iter().filter(|o| o.station == station).collect();

    if rows.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            station: station.to_string(),
            reason: format!("{} observation(s), at least 2 required", rows.len()),
        });
    }

    let measures = Measure::ALL.to_vec();
    let n = measures.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                is_variable(rows.iter().filter_map(|o| defined(o, measures[i]))).then_some(1.0)
            } else {
                pearson(&rows, measures[i], measures[j])
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    let matrix = CorrelationMatrix {
        station: station.to_string(),
        measures,
        values,
        observation_count: rows.len(),
    };

    let degenerate = matrix.degenerate_measures();
    if !degenerate.is_empty() {
        debug!(station, ?degenerate, "Correlation has undefined measures");
    }

    Ok(matrix)
}

/// A measurement usable for correlation; NaN counts as missing
fn defined(observation: &Observation, measure: Measure) -> Option<f64> {
    observation.value(measure).filter(|v| !v.is_nan())
}

/// True when the series has at least two values and they are not all equal
fn is_variable(mut values: impl Iterator<Item = f64>) -> bool {
    let Some(first) = values.next() else {
        return false;
    };
    values.any(|v| v != first)
}

fn pearson(rows: &[&Observation], x: Measure, y: Measure) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|o| Some((defined(o, x)?, defined(o, y)?)))
        .collect();

    if pairs.len() < 2
        || !is_variable(pairs.iter().map(|p| p.0))
        || !is_variable(pairs.iter().map(|p| p.1))
    {
        return None;
    }

    let count = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / count;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / count;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denominator = (sxx * syy).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    Some((sxy / denominator).clamp(-1.0, 1.0))
}

/// Distinct stations in order of first appearance
pub fn stations(observations: &[Observation]) -> Vec<String> {
    let mut seen = HashSet::new();
    observations
        .iter()
        .filter(|o| seen.insert(o.station.as_str()))
        .map(|o| o.station.clone())
        .collect()
}

/// Distinct years, ascending
pub fn available_years(observations: &[Observation]) -> Vec<i32> {
    observations
        .iter()
        .map(|o| o.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Observations selected by the data-table station filter
pub fn filter_by_station<'a>(observations: &'a [Observation], filter: &StationFilter) -> Vec<&'a Observation> {
    observations.iter().filter(|o| filter.matches(&o.station)).collect()
}

/// Fail with `StationNotFound` when the filter names a station absent from the data
pub fn ensure_station_exists(observations: &[Observation], filter: &StationFilter) -> Result<()> {
    match filter.station() {
        Some(name) if !observations.iter().any(|o| o.station == name) => Err(AnalysisError::StationNotFound {
            station: name.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn obs(year: i32, station: &str, pm25: Option<f64>) -> Observation {
        Observation::builder()
            .year(year)
            .station(station)
            .measure(Measure::Pm25, pm25)
            .build()
            .unwrap()
    }

    fn full(station: &str, pm25: f64, pm10: f64, temp: f64, rain: f64) -> Observation {
        Observation::builder()
            .year(2013)
            .station(station)
            .pollutants(pm25, pm10, pm25 / 2.0, 100.0 - pm25)
            .weather(temp, temp - 10.0, rain)
            .build()
            .unwrap()
    }

    #[test]
    fn test_trend_of_empty_input_is_empty() {
        assert!(trend_by_year_and_station(&[]).is_empty());
    }

    #[test]
    fn test_trend_single_group_mean() {
        let values = [12.3, 45.6, 78.9, 0.1, 33.3];
        let observations: Vec<Observation> = values.iter().map(|v| obs(2014, "A", Some(*v))).collect();

        let trend = trend_by_year_and_station(&observations);

        assert_eq!(trend.len(), 1);
        let expected = values.iter().sum::<f64>() / values.len() as f64;
        assert!((trend[0].pm25.unwrap() - expected).abs() < 1e-9);
        assert_eq!(trend[0].observation_count, 5);
    }

    #[test]
    fn test_trend_ordering() {
        let observations = vec![
            obs(2014, "Gucheng", Some(1.0)),
            obs(2013, "Gucheng", Some(2.0)),
            obs(2014, "Changping", Some(3.0)),
            obs(2013, "Changping", Some(4.0)),
        ];

        let keys: Vec<(Option<i32>, String)> = trend_by_year_and_station(&observations)
            .into_iter()
            .map(|r| (r.year, r.station))
            .collect();

        assert_eq!(
            keys,
            vec![
                (Some(2013), "Changping".to_string()),
                (Some(2013), "Gucheng".to_string()),
                (Some(2014), "Changping".to_string()),
                (Some(2014), "Gucheng".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_values_do_not_corrupt_mean() {
        let observations = vec![
            obs(2013, "A", Some(10.0)),
            obs(2013, "A", None),
            obs(2013, "A", Some(20.0)),
        ];

        let trend = trend_by_year_and_station(&observations);
        assert_eq!(trend[0].pm25, Some(15.0));
        assert_eq!(trend[0].observation_count, 3);
    }

    #[test]
    fn test_all_missing_yields_undefined_mean() {
        let observations = vec![obs(2013, "A", None), obs(2013, "A", None)];
        let trend = trend_by_year_and_station(&observations);
        assert_eq!(trend[0].pm25, None);
        assert_eq!(trend[0].pm10, None);
    }

    #[test]
    fn test_average_by_station_partitions_input() {
        let observations = vec![
            obs(2013, "A", Some(10.0)),
            obs(2014, "B", Some(20.0)),
            obs(2015, "A", Some(30.0)),
            obs(2015, "Unexpected", Some(5.0)),
        ];

        let averages = average_by_station(&observations);

        assert_eq!(averages.len(), 3);
        let total: usize = averages.values().map(|r| r.observation_count).sum();
        assert_eq!(total, observations.len());
        for o in &observations {
            assert!(averages.contains_key(&o.station));
        }
        assert_eq!(averages["A"].pm25, Some(20.0));
        assert_eq!(averages["A"].year, None);
    }

    #[test]
    fn test_correlation_is_symmetric_with_unit_diagonal() -> Result<()> {
        let observations = vec![
            full("A", 10.0, 20.0, 5.0, 0.0),
            full("A", 30.0, 35.0, 2.0, 1.5),
            full("A", 55.0, 90.0, -1.0, 0.2),
            full("A", 80.0, 85.0, -4.0, 0.0),
            full("B", 1.0, 1.0, 1.0, 1.0),
        ];

        let matrix = correlation_by_station(&observations, "A")?;

        assert_eq!(matrix.observation_count, 4);
        for i in 0..matrix.size() {
            assert_eq!(matrix.values[i][i], Some(1.0));
            for j in 0..matrix.size() {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }

        // no2 is pm25 / 2, o3 is 100 - pm25
        assert!((matrix.get(Measure::Pm25, Measure::No2).unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get(Measure::Pm25, Measure::O3).unwrap() + 1.0).abs() < 1e-12);
        assert!(matrix.get(Measure::Pm25, Measure::Temp).unwrap() < 0.0);

        Ok(())
    }

    #[test]
    fn test_correlation_constant_measure_is_undefined() -> Result<()> {
        let observations = vec![
            full("A", 10.0, 20.0, 5.0, 0.0),
            full("A", 30.0, 35.0, 2.0, 0.0),
            full("A", 55.0, 90.0, -1.0, 0.0),
        ];

        let matrix = correlation_by_station(&observations, "A")?;

        assert_eq!(matrix.degenerate_measures(), vec![Measure::Rain]);
        assert_eq!(matrix.get(Measure::Rain, Measure::Rain), None);
        assert_eq!(matrix.get(Measure::Rain, Measure::Pm25), None);
        assert!(matrix.get(Measure::Pm25, Measure::Pm10).is_some());

        Ok(())
    }

    fn gappy_rows(gap: Option<f64>) -> Vec<Observation> {
        let pm25 = [Some(1.0), gap, Some(3.0), Some(5.0)];
        let pm10 = [2.0, 5.0, 4.0, 9.0];
        let temp = [1.0, 2.0, 3.0, 5.0];
        (0..4)
            .map(|i| {
                Observation::builder()
                    .year(2014)
                    .station("Dongsi")
                    .measure(Measure::Pm25, pm25[i])
                    .measure(Measure::Pm10, Some(pm10[i]))
                    .measure(Measure::Temp, Some(temp[i]))
                    .build()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_correlation_uses_complete_pairs_only() -> Result<()> {
        let matrix = correlation_by_station(&gappy_rows(None), "Dongsi")?;

        // Pairs (1,2), (3,4), (5,9): sxy = 14, sxx = 8, syy = 26
        let expected = 14.0 / (8.0f64 * 26.0).sqrt();
        let r = matrix.get(Measure::Pm25, Measure::Pm10).unwrap();
        assert!((r - expected).abs() < 1e-9);
        assert!((r - 0.970_725_34).abs() < 1e-8);

        let r = matrix.get(Measure::Pm25, Measure::Temp).unwrap();
        assert!((r - 1.0).abs() < 1e-9);
        assert_eq!(matrix.get(Measure::Pm25, Measure::Pm25), Some(1.0));
        assert_eq!(matrix.observation_count, 4);
        Ok(())
    }

    #[test]
    fn test_correlation_skips_nan_like_missing() -> Result<()> {
        let with_nan = correlation_by_station(&gappy_rows(Some(f64::NAN)), "Dongsi")?;
        let with_gap = correlation_by_station(&gappy_rows(None), "Dongsi")?;

        assert_eq!(with_nan.values, with_gap.values);
        assert!(with_nan.get(Measure::Pm25, Measure::Pm10).is_some());
        Ok(())
    }

    #[test]
    fn test_correlation_requires_two_rows() {
        let observations = vec![full("A", 10.0, 20.0, 5.0, 0.0)];

        let result = correlation_by_station(&observations, "A");
        assert!(matches!(result, Err(AnalysisError::InsufficientData { .. })));

        let result = correlation_by_station(&observations, "Nowhere");
        assert!(matches!(result, Err(AnalysisError::InsufficientData { .. })));
    }

    #[test]
    fn test_stations_years_and_filter() {
        let observations = vec![
            obs(2015, "Gucheng", Some(1.0)),
            obs(2013, "Changping", Some(2.0)),
            obs(2014, "Gucheng", Some(3.0)),
        ];

        assert_eq!(stations(&observations), vec!["Gucheng", "Changping"]);
        assert_eq!(available_years(&observations), vec![2013, 2014, 2015]);

        let filter = StationFilter::Station("Gucheng".to_string());
        assert_eq!(filter_by_station(&observations, &filter).len(), 2);
        assert_eq!(filter_by_station(&observations, &StationFilter::All).len(), 3);
    }

    #[test]
    fn test_unknown_station_filter_is_rejected() {
        let observations = vec![obs(2013, "Gucheng", Some(1.0))];

        assert!(ensure_station_exists(&observations, &StationFilter::All).is_ok());
        assert!(ensure_station_exists(&observations, &StationFilter::parse("Gucheng")).is_ok());
        assert!(matches!(
            ensure_station_exists(&observations, &StationFilter::parse("Atlantis")),
            Err(AnalysisError::StationNotFound { station }) if station == "Atlantis"
        ));
    }
}
