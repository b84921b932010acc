use crate::dashboard::{AnalysisTab, Locale, Page};
use crate::error::{AnalysisError, Result};
use crate::readers::ObservationReader;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aq-dashboard")]
#[command(about = "Exploratory air quality dashboard over station observation data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Input CSV file [default: from settings]")]
    pub input: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = ',', help = "Input CSV field delimiter")]
    pub delimiter: char,

    #[arg(long, global = true, help = "Skip malformed CSV rows instead of failing")]
    pub skip_invalid_rows: bool,

    #[arg(long, global = true, help = "Settings file [default: ./aq-dashboard.toml]")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum, help = "Display language")]
    pub locale: Option<Locale>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// CSV reader configured from the global input flags
    pub fn reader(&self) -> Result<ObservationReader> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| AnalysisError::Config(format!("Delimiter must be ASCII: {:?}", self.delimiter)))?;

        Ok(ObservationReader::new()
            .with_delimiter(delimiter)
            .with_skip_invalid_rows(self.skip_invalid_rows))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize the dataset and report missing values
    Summary,

    /// Yearly mean of PM2.5, PM10, NO2 and O3 per station
    Trend {
        #[arg(short, long)]
        station: Option<String>,
    },

    /// Correlation between pollutant and weather measures per station
    Correlation {
        #[arg(short, long, help = "Station to correlate (repeatable) [default: from settings]")]
        station: Vec<String>,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Mean pollutant levels per station
    Averages,

    /// Classify yearly PM2.5 means into air quality categories
    Classify {
        #[arg(short, long)]
        station: Option<String>,
    },

    /// Render a dashboard page
    Render {
        #[arg(short, long, value_enum, default_value_t = Page::Landing)]
        page: Page,

        #[arg(short, long, value_enum, default_value_t = AnalysisTab::Data)]
        tab: AnalysisTab,

        #[arg(short, long, help = "Station filter, or 'All'")]
        station: Option<String>,
    },

    /// Export a computed table to Parquet or JSON
    Export {
        #[arg(short, long, value_enum)]
        table: ExportTable,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Parquet)]
        format: ExportFormat,

        #[arg(
            short,
            long,
            help = "Output file path [default: {output_dir}/air-quality-{table}-{YYMMDD}.{ext}]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, help = "Parquet compression [default: from settings]")]
        compression: Option<String>,
    },

    /// Display information about an exported Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTable {
    Trend,
    Averages,
    Classification,
}

impl ExportTable {
    pub fn name(&self) -> &'static str {
        match self {
            ExportTable::Trend => "trend",
            ExportTable::Averages => "averages",
            ExportTable::Classification => "classification",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Parquet,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Parquet => "parquet",
            ExportFormat::Json => "json",
        }
    }
}
