//! leetlog CLI: bookkeeping for a solved-problems archive.
//!
//! Merges newly added solution files into the catalog table of a Markdown
//! document and refreshes its coverage summary.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
