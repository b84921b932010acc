use air_quality_dashboard::cli::{run, Cli};
use air_quality_dashboard::error::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
