pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::generate_export_filename_in;
pub use progress::ProgressReporter;
