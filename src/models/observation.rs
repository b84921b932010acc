use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AnalysisError, Result};

/// A numeric pollutant or weather reading carried by every observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Measure {
    Pm25,
    Pm10,
    No2,
    O3,
    Temp,
    Dewp,
    Rain,
}

impl Measure {
    /// Pollutants averaged by the trend and per-station views.
    pub const POLLUTANTS: [Measure; 4] = [Measure::Pm25, Measure::Pm10, Measure::No2, Measure::O3];

    /// Every measure, in correlation-matrix order.
    pub const ALL: [Measure; 7] = [
        Measure::Pm25,
        Measure::Pm10,
        Measure::No2,
        Measure::O3,
        Measure::Temp,
        Measure::Dewp,
        Measure::Rain,
    ];

    /// Column name used by the source dataset
    pub fn column_name(&self) -> &'static str {
        match self {
            Measure::Pm25 => "PM2.5",
            Measure::Pm10 => "PM10",
            Measure::No2 => "NO2",
            Measure::O3 => "O3",
            Measure::Temp => "TEMP",
            Measure::Dewp => "DEWP",
            Measure::Rain => "RAIN",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Measure::Pm25 | Measure::Pm10 | Measure::No2 | Measure::O3 => "µg/m³",
            Measure::Temp | Measure::Dewp => "°C",
            Measure::Rain => "mm",
        }
    }

    pub fn is_pollutant(&self) -> bool {
        Measure::POLLUTANTS.contains(self)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One row of the source table. Numeric fields are `None` when the cell was empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub station: String,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub temp: Option<f64>,
    pub dewp: Option<f64>,
    pub rain: Option<f64>,
}

impl Observation {
    pub fn new(year: i32, station: impl Into<String>) -> Self {
        Self {
            year,
            station: station.into(),
            pm25: None,
            pm10: None,
            no2: None,
            o3: None,
            temp: None,
            dewp: None,
            rain: None,
        }
    }

    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::new()
    }

    pub fn value(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::Pm25 => self.pm25,
            Measure::Pm10 => self.pm10,
            Measure::No2 => self.no2,
            Measure::O3 => self.o3,
            Measure::Temp => self.temp,
            Measure::Dewp => self.dewp,
            Measure::Rain => self.rain,
        }
    }

    fn slot_mut(&mut self, measure: Measure) -> &mut Option<f64> {
        match measure {
            Measure::Pm25 => &mut self.pm25,
            Measure::Pm10 => &mut self.pm10,
            Measure::No2 => &mut self.no2,
            Measure::O3 => &mut self.o3,
            Measure::Temp => &mut self.temp,
            Measure::Dewp => &mut self.dewp,
            Measure::Rain => &mut self.rain,
        }
    }

    pub fn has_missing_data(&self) -> bool {
        Measure::ALL.iter().any(|m| self.value(*m).is_none())
    }

    pub fn is_complete(&self) -> bool {
        !self.has_missing_data()
    }
}

#[derive(Default)]
pub struct ObservationBuilder {
    year: Option<i32>,
    station: Option<String>,
    values: Vec<(Measure, Option<f64>)>,
}

impl ObservationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn measure(mut self, measure: Measure, value: Option<f64>) -> Self {
        self.values.push((measure, value));
        self
    }

    pub fn pm25(self, value: f64) -> Self {
        self.measure(Measure::Pm25, Some(value))
    }

    pub fn pollutants(self, pm25: f64, pm10: f64, no2: f64, o3: f64) -> Self {
        self.measure(Measure::Pm25, Some(pm25))
            .measure(Measure::Pm10, Some(pm10))
            .measure(Measure::No2, Some(no2))
            .measure(Measure::O3, Some(o3))
    }

    pub fn weather(self, temp: f64, dewp: f64, rain: f64) -> Self {
        self.measure(Measure::Temp, Some(temp))
            .measure(Measure::Dewp, Some(dewp))
            .measure(Measure::Rain, Some(rain))
    }

    pub fn build(self) -> Result<Observation> {
        let year = self
            .year
            .ok_or_else(|| AnalysisError::MissingData("year".to_string()))?;
        let station = self
            .station
            .ok_or_else(|| AnalysisError::MissingData("station".to_string()))?;

        let mut observation = Observation::new(year, station);
        for (measure, value) in self.values {
            *observation.slot_mut(measure) = value;
        }
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_column_names() {
        assert_eq!(Measure::Pm25.column_name(), "PM2.5");
        assert!(Measure::O3.is_pollutant());
        assert!(!Measure::Rain.is_pollutant());
    }

    #[test]
    fn test_builder_pattern() {
        let observation = Observation::builder()
            .year(2014)
            .station("Gucheng")
            .pollutants(80.0, 120.0, 55.0, 30.0)
            .weather(12.5, -3.0, 0.0)
            .build()
            .unwrap();

        assert_eq!(observation.year, 2014);
        assert_eq!(observation.station, "Gucheng");
        assert_eq!(observation.value(Measure::Pm10), Some(120.0));
        assert_eq!(observation.value(Measure::Dewp), Some(-3.0));
        assert!(observation.is_complete());
    }

    #[test]
    fn test_builder_requires_station() {
        let result = Observation::builder().year(2013).pm25(10.0).build();
        assert!(matches!(result, Err(AnalysisError::MissingData(field)) if field == "station"));
    }

    #[test]
    fn test_missing_values() {
        let observation = Observation::builder()
            .year(2013)
            .station("Changping")
            .pm25(10.0)
            .build()
            .unwrap();

        assert!(observation.has_missing_data());
        assert_eq!(observation.value(Measure::No2), None);
    }
}
