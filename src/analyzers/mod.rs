pub mod aggregator;
pub mod classifier;
pub mod dataset_analyzer;

pub use classifier::{classify, ClassifiedRecord};
pub use dataset_analyzer::{DatasetAnalyzer, DatasetStatistics};
