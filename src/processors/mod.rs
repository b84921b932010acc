pub mod completeness_checker;
pub mod parallel_processor;

pub use completeness_checker::{CompletenessChecker, CompletenessReport, StationStatistics};
pub use parallel_processor::{ParallelProcessor, StationCorrelation};
