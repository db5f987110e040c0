//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use sift_core::ColumnRole;

/// Sift - Parse bank statements into normalized transactions
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Statement ingestion parser for heterogeneous bank exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a statement file (csv/tsv/txt/xlsx) and print transactions
    Parse {
        /// Statement file to parse
        #[arg(short, long)]
        file: PathBuf,

        /// Field delimiter for delimited text (auto: ',' or '\t' by extension)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Manual header row index (bypasses header detection;
        /// requires at least --column date=N and an amount column)
        #[arg(long, requires = "column")]
        header_row: Option<usize>,

        /// Manual role=index column mapping, repeatable
        /// (e.g. --column date=0 --column debit=2)
        #[arg(long, value_parser = parse_column_spec)]
        column: Vec<(ColumnRole, usize)>,
    },

    /// Parse document-extracted text fragments from a JSON dump
    ParseDoc {
        /// JSON file: an array of pages, each with a "fragments" list of
        /// {text, x, y, height} items
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Run header detection only and print the row/column mapping
    Detect {
        /// Statement file to inspect
        #[arg(short, long)]
        file: PathBuf,

        /// Field delimiter for delimited text
        #[arg(short, long)]
        delimiter: Option<char>,
    },
}

/// Parse a `role=index` pair like `date=0` or `credit=3`.
pub fn parse_column_spec(spec: &str) -> Result<(ColumnRole, usize), String> {
    let (role, index) = spec
        .split_once('=')
        .ok_or_else(|| format!("Expected role=index, got: {}", spec))?;
    let role = ColumnRole::from_str(role.trim())?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("Invalid column index: {}", index))?;
    Ok((role, index))
}
