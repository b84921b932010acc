use crate::analyzers::aggregator::{
    average_by_station, ensure_station_exists, filter_by_station, stations, trend_by_year_and_station,
};
use crate::analyzers::classifier::{category_color, classify_station_trend, ClassifiedRecord};
use crate::dashboard::locale::Locale;
use crate::dashboard::view_state::{AnalysisTab, Page, ViewState};
use crate::error::{AnalysisError, Result};
use crate::models::{AggregateRecord, AirQualityCategory, CorrelationMatrix, Measure, Observation, StationFilter};
use crate::processors::{ParallelProcessor, StationCorrelation};
use crate::utils::constants::DEFAULT_TABLE_ROWS;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

const RULE: &str = "---";

/// Renders dashboard views as plain-text tables.
pub struct DashboardRenderer {
    locale: Locale,
    table_rows: usize,
    correlation_stations: Vec<String>,
    max_workers: usize,
}

impl DashboardRenderer {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            table_rows: DEFAULT_TABLE_ROWS,
            correlation_stations: Vec::new(),
            max_workers: num_cpus::get(),
        }
    }

    pub fn with_table_rows(mut self, rows: usize) -> Self {
        self.table_rows = rows.max(1);
        self
    }

    /// Stations shown in the correlation section; empty means every station in the data
    pub fn with_correlation_stations(mut self, stations: Vec<String>) -> Self {
        self.correlation_stations = stations;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Render the page and tab selected by `view`
    pub fn render(&self, view: &ViewState, observations: &[Observation]) -> Result<String> {
        match view.page {
            Page::Landing => Ok(self.render_landing()),
            Page::Analysis => {
                let text = self.locale.strings();
                let mut out = format!("{}\n[{}]\n\n", text.analysis_title, self.locale.tab_title(view.tab));
                let body = match view.tab {
                    AnalysisTab::Data => self.render_data_table(observations, &view.station)?,
                    AnalysisTab::Analysis => self.render_analysis(observations)?,
                    AnalysisTab::Classification => self.render_classification_tab(observations, &view.station)?,
                };
                out.push_str(&body);
                Ok(out)
            }
        }
    }

    pub fn render_landing(&self) -> String {
        let text = self.locale.strings();

        let analyses: String = text.analyses.iter().map(|a| format!("  - {}\n", a)).collect();
        format!(
            "{}\n\n{}\n{}\n\n{}\n{}\n{}\n",
            text.app_title, text.app_intro, RULE, text.analyses_heading, analyses, text.call_to_action
        )
    }

    /// Raw observations, optionally filtered to one station, truncated to the configured row count
    pub fn render_data_table(&self, observations: &[Observation], filter: &StationFilter) -> Result<String> {
        let text = self.locale.strings();
        ensure_station_exists(observations, filter)?;

        let rows = filter_by_station(observations, filter);
        let mut out = format!("{}: {}\n\n", text.station_label, filter);

        out.push_str(&format!("{:>6}  {:<14}", text.year_label, text.station_label));
        for measure in Measure::ALL {
            out.push_str(&format!(" {:>8}", measure.column_name()));
        }
        out.push('\n');

        for observation in rows.iter().take(self.table_rows) {
            out.push_str(&format!("{:>6}  {:<14}", observation.year, observation.station));
            for measure in Measure::ALL {
                out.push_str(&format!(" {:>8}", format_value(observation.value(measure), 1)));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "\n{} / {} {}\n",
            rows.len().min(self.table_rows),
            rows.len(),
            text.rows_shown
        ));
        Ok(out)
    }

    /// Questions 1-3: trends, correlations and averages
    pub fn render_analysis(&self, observations: &[Observation]) -> Result<String> {
        let text = self.locale.strings();

        let mut out = format!("{}\n{}\n\n", text.trend_heading, text.trend_question);
        out.push_str(&self.render_trend(&trend_by_year_and_station(observations)));
        out.push_str(&format!("{}\n\n", RULE));

        out.push_str(&format!("{}\n{}\n\n", text.correlation_heading, text.correlation_question));
        let selected = if self.correlation_stations.is_empty() {
            stations(observations)
        } else {
            self.correlation_stations.clone()
        };
        let correlations =
            ParallelProcessor::new(self.max_workers).correlations_by_station(observations, &selected, None)?;
        out.push_str(&self.render_correlations(&correlations));
        out.push_str(&format!("{}\n\n", RULE));

        out.push_str(&format!("{}\n{}\n\n", text.average_heading, text.average_question));
        out.push_str(&self.render_averages(&average_by_station(observations)));

        Ok(out)
    }

    /// One year-by-station table per pollutant. Input order does not matter.
    pub fn render_trend(&self, trend: &[AggregateRecord]) -> String {
        let text = self.locale.strings();

        if trend.is_empty() {
            return format!("{}\n\n", text.no_data);
        }

        let station_names: BTreeSet<&str> = trend.iter().map(|r| r.station.as_str()).collect();
        let years: BTreeSet<i32> = trend.iter().filter_map(|r| r.year).collect();
        let lookup: BTreeMap<(i32, &str), &AggregateRecord> = trend
            .iter()
            .filter_map(|r| r.year.map(|y| ((y, r.station.as_str()), r)))
            .collect();

        let mut out = String::new();
        for measure in Measure::POLLUTANTS {
            out.push_str(&format!(
                "{} ({})\n",
                self.locale.trend_chart_title(measure.column_name()),
                measure.units()
            ));
            out.push_str(&format!("{:>6}", text.year_label));
            for station in &station_names {
                out.push_str(&format!(" {:>14}", station));
            }
            out.push('\n');

            for year in &years {
                out.push_str(&format!("{:>6}", year));
                for station in &station_names {
                    let value = lookup.get(&(*year, *station)).and_then(|r| r.mean(measure));
                    out.push_str(&format!(" {:>14}", format_value(value, 2)));
                }
                out.push('\n');
            }
            out.push('\n');
        }

        out
    }

    pub fn render_correlations(&self, correlations: &[StationCorrelation]) -> String {
        let text = self.locale.strings();

        correlations
            .iter()
            .map(|correlation| match &correlation.result {
                Ok(matrix) => self.render_correlation(matrix),
                Err(e) => format!("{}: {} ({})\n\n", correlation.station, text.unavailable, e),
            })
            .collect()
    }

    /// Coefficient grid followed by the weather measure each pollutant tracks most closely
    pub fn render_correlation(&self, matrix: &CorrelationMatrix) -> String {
        let mut out = format!("{}\n{:>6}", self.locale.correlation_title(&matrix.station), "");
        for measure in &matrix.measures {
            out.push_str(&format!(" {:>7}", measure.column_name()));
        }
        out.push('\n');

        for (measure, row) in matrix.measures.iter().zip(&matrix.values) {
            out.push_str(&format!("{:>6}", measure.column_name()));
            for value in row {
                out.push_str(&format!(" {:>7}", format_value(*value, 2)));
            }
            out.push('\n');
        }
        out.push('\n');

        for pollutant in Measure::POLLUTANTS {
            if let Some((factor, r)) = matrix.strongest_weather_driver(pollutant) {
                out.push_str(&format!("  - {}\n", self.locale.weather_driver(pollutant, factor, r)));
            }
        }
        out.push('\n');

        out
    }

    /// Per-station means, most polluted first, with the top station called out
    pub fn render_averages(&self, averages: &BTreeMap<String, AggregateRecord>) -> String {
        let text = self.locale.strings();

        let mut out = format!("{:<14}", text.station_label);
        for measure in Measure::POLLUTANTS {
            out.push_str(&format!(" {:>8}", measure.column_name()));
        }
        out.push('\n');

        // Stations without PM2.5 go last
        let mut ranked: Vec<&AggregateRecord> = averages.values().collect();
        ranked.sort_by(|a, b| match (a.pm25, b.pm25) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.station.cmp(&b.station),
        });

        for record in &ranked {
            out.push_str(&format!("{:<14}", record.station));
            for measure in Measure::POLLUTANTS {
                out.push_str(&format!(" {:>8}", format_value(record.mean(measure), 2)));
            }
            out.push('\n');
        }

        if let Some((record, pm25)) = ranked.first().and_then(|r| r.pm25.map(|v| (r, v))) {
            out.push_str(&format!(
                "\n{}: {} ({:.2} µg/m³)\n",
                text.highest_pollution, record.station, pm25
            ));
        }
        out.push('\n');

        out
    }

    fn render_classification_tab(&self, observations: &[Observation], filter: &StationFilter) -> Result<String> {
        let station = match filter.station() {
            Some(name) => name.to_string(),
            None => stations(observations)
                .into_iter()
                .next()
                .ok_or_else(|| AnalysisError::MissingData("no stations in dataset".to_string()))?,
        };

        let classified = classify_station_trend(observations, &station)?;
        let mut out = format!("{}\n\n", self.locale.strings().classification_heading);
        out.push_str(&self.render_classification(&station, &classified));
        out.push_str(&self.render_legend());
        Ok(out)
    }

    pub fn render_classification(&self, station: &str, classified: &[ClassifiedRecord]) -> String {
        let text = self.locale.strings();

        let mut out = format!(
            "{}\n{:>6} {:>8}  {:<20} {}\n",
            self.locale.classification_title(station),
            text.year_label,
            "PM2.5",
            text.category_label,
            text.legend_columns[2]
        );
        for entry in classified {
            let year = entry.record.year.map(|y| y.to_string()).unwrap_or_default();
            out.push_str(&format!(
                "{:>6} {:>8.2}  {:<20} {}\n",
                year,
                entry.pm25(),
                entry.category.label(),
                category_color(entry.category)
            ));
        }
        out.push('\n');

        out
    }

    pub fn render_legend(&self) -> String {
        let text = self.locale.strings();
        let [category, range, color, meaning] = text.legend_columns;

        let mut out = format!(
            "{}\n\n| {} | {} | {} | {} |\n|---|---|---|---|\n",
            text.legend_heading, category, range, color, meaning
        );
        for entry in AirQualityCategory::ALL {
            out.push_str(&format!(
                "| {} | {} | {} ({}) | {} |\n",
                entry.label(),
                entry.range_label(),
                self.locale.color_name(entry),
                category_color(entry),
                self.locale.category_meaning(entry)
            ));
        }

        out
    }
}

pub(crate) fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Observation> {
        let rows = [
            (2013, "Changping", 10.0, 30.0, 2.0),
            (2013, "Changping", 20.0, 40.0, 1.0),
            (2014, "Changping", 40.0, 70.0, -1.0),
            (2013, "Gucheng", 90.0, 120.0, 0.5),
            (2014, "Gucheng", 110.0, 150.0, -2.0),
            (2014, "Gucheng", 130.0, 160.0, -3.0),
        ];
        rows.iter()
            .map(|(year, station, pm25, pm10, temp)| {
                Observation::builder()
                    .year(*year)
                    .station(*station)
                    .pollutants(*pm25, *pm10, pm25 / 3.0, 80.0 - pm25 / 2.0)
                    .weather(*temp, temp - 8.0, if *pm25 > 50.0 { 0.0 } else { 0.4 })
                    .build()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_landing_page_is_localized() {
        let english = DashboardRenderer::new(Locale::English).render(&ViewState::default(), &[]).unwrap();
        let indonesian = DashboardRenderer::new(Locale::Indonesian)
            .render(&ViewState::default(), &[])
            .unwrap();

        assert!(english.contains("Air Quality Dashboard"));
        assert!(english.contains("Available analyses"));
        assert!(indonesian.contains("Jenis Analisis yang Tersedia"));
    }

    #[test]
    fn test_data_table_filters_and_truncates() {
        let renderer = DashboardRenderer::new(Locale::English).with_table_rows(2);
        let view = ViewState::default()
            .with_tab(AnalysisTab::Data)
            .with_station(StationFilter::parse("Gucheng"));

        let out = renderer.render(&view, &sample()).unwrap();

        assert!(out.contains("City: Gucheng"));
        assert!(!out.contains("Changping"));
        assert!(out.contains("2 / 3 rows shown"));
    }

    #[test]
    fn test_unknown_station_is_reported() {
        let renderer = DashboardRenderer::new(Locale::English);
        let view = ViewState::default().with_station(StationFilter::parse("Atlantis"));
        let result = renderer.render_data_table(&sample(), &view.station);
        assert!(matches!(result, Err(AnalysisError::StationNotFound { .. })));
    }

    #[test]
    fn test_analysis_tab_contains_all_sections() {
        let renderer = DashboardRenderer::new(Locale::English)
            .with_max_workers(2)
            .with_correlation_stations(vec!["Changping".to_string(), "Nongzhanguan".to_string()]);
        let view = ViewState::default().with_tab(AnalysisTab::Analysis);

        let out = renderer.render(&view, &sample()).unwrap();

        assert!(out.contains("PM2.5 trend by year"));
        assert!(out.contains("O3 trend by year"));
        assert!(out.contains("Weather & air pollution correlation in Changping"));
        assert!(out.contains("Nongzhanguan: unavailable"));
        assert!(out.contains("Highest average PM2.5: Gucheng (110.00 µg/m³)"));
    }

    #[test]
    fn test_trend_table_pivots_stations() {
        let renderer = DashboardRenderer::new(Locale::English);
        let out = renderer.render_trend(&trend_by_year_and_station(&sample()));

        // Changping 2013 mean of 10 and 20
        assert!(out.contains("15.00"));
        assert!(out.contains("120.00"));
        assert_eq!(renderer.render_trend(&[]).trim(), "No data");
    }

    #[test]
    fn test_trend_table_ignores_input_order() {
        let renderer = DashboardRenderer::new(Locale::English);
        let sorted = trend_by_year_and_station(&sample());
        let mut shuffled = sorted.clone();
        shuffled.reverse();

        let out = renderer.render_trend(&shuffled);
        assert_eq!(out, renderer.render_trend(&sorted));
        assert_eq!(out.matches("  2013 ").count(), 4);
    }

    #[test]
    fn test_correlation_names_weather_driver() {
        let renderer = DashboardRenderer::new(Locale::English);
        let matrix = crate::analyzers::aggregator::correlation_by_station(&sample(), "Changping").unwrap();

        let out = renderer.render_correlation(&matrix);
        assert!(out.contains("Weather & air pollution correlation in Changping"));
        assert!(out.contains("  - PM2.5 follows "));
        assert!(!out.contains("follows RAIN"));
    }

    #[test]
    fn test_averages_ranked_by_pm25() {
        let renderer = DashboardRenderer::new(Locale::English);
        let out = renderer.render_averages(&average_by_station(&sample()));

        let gucheng = out.find("Gucheng").unwrap();
        let changping = out.find("Changping").unwrap();
        assert!(gucheng < changping);
    }

    #[test]
    fn test_classification_tab_defaults_to_first_station() {
        let renderer = DashboardRenderer::new(Locale::Indonesian);
        let view = ViewState::default().with_tab(AnalysisTab::Classification);

        let out = renderer.render(&view, &sample()).unwrap();

        assert!(out.contains("Kualitas Udara (PM2.5) di Changping per Tahun"));
        assert!(out.contains("Excellent"));
        assert!(out.contains("#2E91E5"));
        assert!(out.contains("Keterangan"));
        assert!(out.contains("Merah Tua"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(1.234), 2), "1.23");
        assert_eq!(format_value(None, 2), "-");
    }
}
