use crate::analyzers::aggregator::correlation_by_station;
use crate::error::{AnalysisError, Result};
use crate::models::{CorrelationMatrix, Observation};
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Correlation result for one station; failures stay local to that station.
#[derive(Debug)]
pub struct StationCorrelation {
    pub station: String,
    pub result: Result<CorrelationMatrix>,
}

pub struct ParallelProcessor {
    max_workers: usize,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Compute one correlation matrix per station on a bounded worker pool.
    ///
    /// Output order follows `stations`.
    pub fn correlations_by_station(
        &self,
        observations: &[Observation],
        stations: &[String],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<StationCorrelation>> {
        let processed_count = AtomicUsize::new(0);

        if let Some(p) = progress {
            p.set_message(&format!("Correlating {} stations...", stations.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        let results: Vec<StationCorrelation> = pool.install(|| {
            stations
                .par_iter()
                .map(|station| {
                    let result = correlation_by_station(observations, station);
                    if let Err(e) = &result {
                        warn!(station = %station, error = %e, "Correlation unavailable");
                    }

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = progress {
                        p.update(count as u64);
                    }

                    StationCorrelation {
                        station: station.clone(),
                        result,
                    }
                })
                .collect()
        });

        if let Some(p) = progress {
            p.finish_with_message(&format!("Correlated {} stations", stations.len()));
        }

        Ok(results)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
