use serde::{Deserialize, Serialize};
use std::fmt;

/// Station selection used by the data table and per-city views.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StationFilter {
    #[default]
    All,
    Station(String),
}

impl StationFilter {
    pub const ALL_LABEL: &'static str = "All";

    /// `"All"` (any case) or an empty string selects every station
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::ALL_LABEL) {
            StationFilter::All
        } else {
            StationFilter::Station(trimmed.to_string())
        }
    }

    pub fn from_option(station: Option<&str>) -> Self {
        station.map_or(StationFilter::All, Self::parse)
    }

    pub fn matches(&self, station: &str) -> bool {
        match self {
            StationFilter::All => true,
            StationFilter::Station(name) => name == station,
        }
    }

    pub fn station(&self) -> Option<&str> {
        match self {
            StationFilter::All => None,
            StationFilter::Station(name) => Some(name),
        }
    }
}

impl fmt::Display for StationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationFilter::All => f.write_str(Self::ALL_LABEL),
            StationFilter::Station(name) => f.write_str(name),
        }
    }
}
