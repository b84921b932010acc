use serde::{Deserialize, Serialize};

use crate::models::Measure;

/// Pairwise Pearson coefficients between measures for a single station.
///
/// Cells are `None` where a coefficient is undefined: fewer than two rows
/// carry both measures, or one of them has zero variance over those rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub station: String,
    pub measures: Vec<Measure>,
    pub values: Vec<Vec<Option<f64>>>,
    pub observation_count: usize,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.measures.len()
    }

    pub fn index_of(&self, measure: Measure) -> Option<usize> {
        self.measures.iter().position(|m| *m == measure)
    }

    pub fn get(&self, row: Measure, column: Measure) -> Option<f64> {
        let i = self.index_of(row)?;
        let j = self.index_of(column)?;
        self.values[i][j]
    }

    /// Measures whose diagonal cell is undefined
    pub fn degenerate_measures(&self) -> Vec<Measure> {
        self.measures
            .iter()
            .enumerate()
            .filter(|(i, _)| self.values[*i][*i].is_none())
            .map(|(_, m)| *m)
            .collect()
    }

    /// Weather measure with the largest absolute coefficient against `pollutant`.
    pub fn strongest_weather_driver(&self, pollutant: Measure) -> Option<(Measure, f64)> {
        let i = self.index_of(pollutant)?;
        self.measures
            .iter()
            .enumerate()
            .filter(|(j, m)| *j != i && !m.is_pollutant())
            .filter_map(|(j, m)| self.values[i][j].map(|r| (*m, r)))
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    }
}
