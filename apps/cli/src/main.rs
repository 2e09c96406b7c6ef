//! dictbuilder CLI — GCIDE markup to Kindle-ready tab-delimited dictionaries.
//!
//! Extracts a flat lexicon from the GCIDE XML letter files, then merges it
//! with a book's character list into one combined word list.

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
