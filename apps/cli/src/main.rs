//! DashPrep CLI — research-dashboard dataset preparation tool.
//!
//! Turns raw personnel and funded-project tables into the aggregate
//! statistics and dataset artifacts consumed by the dashboard frontend.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
