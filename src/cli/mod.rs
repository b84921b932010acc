pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ExportFormat, ExportTable};
pub use commands::run;
