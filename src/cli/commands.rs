use crate::analyzers::aggregator::{
    average_by_station, ensure_station_exists, stations, trend_by_year_and_station,
};
use crate::analyzers::classifier::{classify_station_trend, ClassifiedRecord};
use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands, ExportFormat, ExportTable};
use crate::config::Settings;
use crate::dashboard::{DashboardRenderer, ViewState};
use crate::error::Result;
use crate::models::{AggregateRecord, Observation, StationFilter};
use crate::processors::{CompletenessChecker, ParallelProcessor};
use crate::readers::ObservationReader;
use crate::utils::filename::generate_export_filename_in;
use crate::utils::progress::ProgressReporter;
use crate::writers::{JsonWriter, ParquetWriter};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref())?;
    let reader = cli.reader()?;
    let locale = cli.locale.unwrap_or(settings.locale);
    let input = cli.input.unwrap_or_else(|| settings.data_path());

    let renderer = DashboardRenderer::new(locale)
        .with_table_rows(settings.table_rows)
        .with_correlation_stations(settings.correlation_stations.clone());

    match cli.command {
        Commands::Summary => {
            let observations = load_observations(&reader, &input)?;

            let analyzer = DatasetAnalyzer::new();
            let statistics = analyzer.analyze(&observations)?;
            println!("\n{}", statistics.detailed_summary());

            let checker = CompletenessChecker::new();
            let report = checker.check(&observations);
            println!("\n{}", checker.generate_summary(&report));
        }

        Commands::Trend { station } => {
            let observations = load_observations(&reader, &input)?;
            let filter = StationFilter::from_option(station.as_deref());
            ensure_station_exists(&observations, &filter)?;

            let trend: Vec<AggregateRecord> = trend_by_year_and_station(&observations)
                .into_iter()
                .filter(|r| filter.matches(&r.station))
                .collect();

            println!("\n{}", renderer.render_trend(&trend));
        }

        Commands::Correlation {
            station,
            max_workers,
        } => {
            let observations = load_observations(&reader, &input)?;
            let selected = if station.is_empty() {
                settings.correlation_stations.clone()
            } else {
                station
            };

            let progress = ProgressReporter::new(selected.len() as u64, "Correlating stations...", false);
            let correlations = ParallelProcessor::new(max_workers).correlations_by_station(
                &observations,
                &selected,
                Some(&progress),
            )?;

            println!("\n{}", renderer.render_correlations(&correlations));
        }

        Commands::Averages => {
            let observations = load_observations(&reader, &input)?;
            println!("\n{}", renderer.render_averages(&average_by_station(&observations)));
        }

        Commands::Classify { station } => {
            let observations = load_observations(&reader, &input)?;
            let selected = match station {
                Some(name) => vec![name],
                None => stations(&observations),
            };

            for name in &selected {
                let classified = classify_station_trend(&observations, name)?;
                println!("\n{}", renderer.render_classification(name, &classified));
            }
            println!("{}", renderer.render_legend());
        }

        Commands::Render { page, tab, station } => {
            let observations = load_observations(&reader, &input)?;
            let view = ViewState::new(page, tab, StationFilter::from_option(station.as_deref()));
            println!("\n{}", renderer.render(&view, &observations)?);
        }

        Commands::Export {
            table,
            format,
            output_file,
            compression,
        } => {
            let observations = load_observations(&reader, &input)?;
            let output_file = output_file.unwrap_or_else(|| {
                generate_export_filename_in(&settings.output_dir(), table.name(), format.extension())
            });

            if let Some(parent) = output_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let compression = compression.unwrap_or_else(|| settings.compression.clone());
            export_table(&observations, table, format, &compression, &output_file)?;

            if format == ExportFormat::Parquet {
                let file_info = ParquetWriter::new().get_file_info(&output_file)?;
                println!("\n{}", file_info.summary());
            }
            println!("Exported {} table to {}", table.name(), output_file.display());
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            if sample > 0 {
                println!("\nSample Records (showing up to {} records):", sample);
                match writer.read_aggregates(&file, sample) {
                    Ok(records) => {
                        for (i, record) in records.iter().enumerate() {
                            println!(
                                "{}. {}: PM2.5={}, PM10={}, NO2={}, O3={} ({} observations)",
                                i + 1,
                                record.group_label(),
                                fmt_mean(record.pm25),
                                fmt_mean(record.pm10),
                                fmt_mean(record.no2),
                                fmt_mean(record.o3),
                                record.observation_count
                            );
                        }
                    }
                    Err(e) => println!("Error reading sample data: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// Log to stderr, and mirror to a plain-text file when one is given.
/// `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?))
                .with_filter(filter()),
        ),
        None => None,
    };

    // A subscriber may already be installed when run is called more than once
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if verbose {
        info!("Verbose logging enabled");
    }
    Ok(())
}

fn load_observations(reader: &ObservationReader, path: &Path) -> Result<Vec<Observation>> {
    let progress = ProgressReporter::new_spinner(&format!("Loading {}...", path.display()), false);
    let observations = reader.read_observations(path)?;
    progress.finish_with_message(&format!("Loaded {} observations", observations.len()));
    Ok(observations)
}

/// Compute the requested table and write it in the requested format
pub fn export_table(
    observations: &[Observation],
    table: ExportTable,
    format: ExportFormat,
    compression: &str,
    output_file: &Path,
) -> Result<()> {
    match table {
        ExportTable::Trend | ExportTable::Averages => {
            let records: Vec<AggregateRecord> = match table {
                ExportTable::Trend => trend_by_year_and_station(observations),
                _ => average_by_station(observations).into_values().collect(),
            };

            match format {
                ExportFormat::Parquet => ParquetWriter::new()
                    .with_compression(compression)?
                    .write_aggregates(&records, output_file),
                ExportFormat::Json => JsonWriter::new().write_records(&records, output_file),
            }
        }
        ExportTable::Classification => {
            let mut classified: Vec<ClassifiedRecord> = Vec::new();
            for station in stations(observations) {
                match classify_station_trend(observations, &station) {
                    Ok(records) => classified.extend(records),
                    Err(e) => warn!(station = %station, error = %e, "Skipping station"),
                }
            }
            info!(rows = classified.len(), "Classified station-years");

            match format {
                ExportFormat::Parquet => ParquetWriter::new()
                    .with_compression(compression)?
                    .write_classified(&classified, output_file),
                ExportFormat::Json => JsonWriter::new().write_records(&classified, output_file),
            }
        }
    }
}

fn fmt_mean(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}
