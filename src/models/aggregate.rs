use serde::{Deserialize, Serialize};

use crate::models::Measure;

/// Mean pollutant levels over a group of observations.
///
/// `year` is `None` when the group is keyed by station alone. A mean is `None`
/// when every observation in the group lacked that measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub year: Option<i32>,
    pub station: String,
    pub observation_count: usize,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
}

impl AggregateRecord {
    pub fn mean(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::Pm25 => self.pm25,
            Measure::Pm10 => self.pm10,
            Measure::No2 => self.no2,
            Measure::O3 => self.o3,
            Measure::Temp | Measure::Dewp | Measure::Rain => None,
        }
    }

    /// Label used in tables and logs, e.g. `Changping 2014` or `Changping`
    pub fn group_label(&self) -> String {
        match self.year {
            Some(year) => format!("{} {}", self.station, year),
            None => self.station.clone(),
        }
    }
}

/// Running sum and count for one measure within a group.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_skips_missing() {
        let mut acc = MeanAccumulator::default();
        acc.push(Some(10.0));
        acc.push(None);
        acc.push(Some(f64::NAN));
        acc.push(Some(20.0));

        assert_eq!(acc.mean(), Some(15.0));
    }

    #[test]
    fn test_empty_accumulator_has_no_mean() {
        let mut acc = MeanAccumulator::default();
        acc.push(None);
        assert_eq!(acc.mean(), None);
    }

    #[test]
    fn test_group_label() {
        let record = AggregateRecord {
            year: Some(2015),
            station: "Nongzhanguan".to_string(),
            observation_count: 1,
            pm25: Some(1.0),
            pm10: None,
            no2: None,
            o3: None,
        };
        assert_eq!(record.group_label(), "Nongzhanguan 2015");
        assert_eq!(record.mean(Measure::Pm25), Some(1.0));
        assert_eq!(record.mean(Measure::Temp), None);
    }
}
