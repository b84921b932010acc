use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Export path `{dir}/air-quality-{table}-{YYMMDD}.{extension}`
pub fn generate_export_filename_in(dir: &Path, table: &str, extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "air-quality-{}-{:02}{:02}{:02}.{}",
        table, year, month, day, extension
    );
    dir.join(filename)
}
