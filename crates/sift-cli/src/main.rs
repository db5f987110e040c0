//! Sift CLI - Statement ingestion parser
//!
//! Usage:
//!   sift parse --file statement.csv      Parse a delimited statement
//!   sift parse --file statement.xlsx     Parse a workbook statement
//!   sift parse-doc --file pages.json     Parse document text fragments
//!   sift detect --file statement.csv     Header detection preview

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Parse {
            file,
            delimiter,
            header_row,
            column,
        } => commands::cmd_parse(&file, delimiter, header_row, &column),
        Commands::ParseDoc { file } => commands::cmd_parse_doc(&file),
        Commands::Detect { file, delimiter } => commands::cmd_detect(&file, delimiter),
    }
}
