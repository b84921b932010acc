pub mod aggregate;
pub mod category;
pub mod correlation;
pub mod observation;
pub mod station;

pub use aggregate::{AggregateRecord, MeanAccumulator};
pub use category::AirQualityCategory;
pub use correlation::CorrelationMatrix;
pub use observation::{Measure, Observation, ObservationBuilder};
pub use station::StationFilter;
