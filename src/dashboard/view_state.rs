use crate::models::StationFilter;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Page {
    #[default]
    Landing,
    Analysis,
}

/// Tabs of the analysis page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum AnalysisTab {
    /// Raw observation table with a station filter
    #[default]
    Data,
    /// Pollutant trends, weather correlations and per-station averages
    Analysis,
    /// PM2.5 categories per year for one station
    Classification,
}

/// What the user is currently looking at. Transitions produce a new state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub page: Page,
    pub tab: AnalysisTab,
    pub station: StationFilter,
}

impl ViewState {
    pub fn new(page: Page, tab: AnalysisTab, station: StationFilter) -> Self {
        Self { page, tab, station }
    }

    pub fn with_page(&self, page: Page) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn with_tab(&self, tab: AnalysisTab) -> Self {
        Self {
            page: Page::Analysis,
            tab,
            station: self.station.clone(),
        }
    }

    pub fn with_station(&self, station: StationFilter) -> Self {
        Self {
            station,
            ..self.clone()
        }
    }
}
