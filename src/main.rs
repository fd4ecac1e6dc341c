//! dialect-opgen - CLI for generating dialect operator definition files

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    cli.init_logging();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = cli.into_options();
    let summary = dialect_opgen::generate(&options)
        .context("operator definition generation failed")?;
    tracing::info!(ops = summary.op_count, "generation complete");
    Ok(())
}
