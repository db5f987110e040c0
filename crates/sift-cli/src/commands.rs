//! Command implementations

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use sift_core::{
    detect_header, parse_matrix, parse_with_mapping, ColumnMap, ColumnRole, Error, ParserConfig,
    RawMatrix,
};
use tracing::info;

/// Load a tabular statement file into a matrix, dispatching on extension.
fn read_matrix(file: &Path, delimiter: Option<char>) -> Result<RawMatrix> {
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let matrix = match extension.as_str() {
        "xlsx" | "xls" => {
            let bytes = std::fs::read(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            RawMatrix::from_workbook(&bytes)?
        }
        "csv" | "txt" | "tsv" => {
            let delimiter = delimiter.unwrap_or(if extension == "tsv" { '\t' } else { ',' });
            if !delimiter.is_ascii() {
                bail!("delimiter must be a single ASCII character, got {:?}", delimiter);
            }
            let reader = File::open(file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            RawMatrix::from_delimited(reader, delimiter as u8)?
        }
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "unrecognized statement extension: {:?}",
                other
            ))
            .into())
        }
    };

    info!("Loaded {} rows from {}", matrix.len(), file.display());
    Ok(matrix)
}

pub fn cmd_parse(
    file: &Path,
    delimiter: Option<char>,
    header_row: Option<usize>,
    columns: &[(ColumnRole, usize)],
) -> Result<()> {
    let matrix = read_matrix(file, delimiter)?;
    let config = ParserConfig::default();

    let result = match header_row {
        Some(row) => {
            let mapping: ColumnMap = columns.iter().copied().collect();
            parse_with_mapping(&matrix, row, &mapping, &config)
        }
        None => parse_matrix(&matrix, &config),
    };

    match result {
        Ok(transactions) => {
            println!("{}", serde_json::to_string_pretty(&transactions)?);
            Ok(())
        }
        Err(Error::HeaderDetectionFailed { preview }) => {
            eprintln!("No header row detected. First rows for manual mapping:");
            eprintln!("{}", serde_json::to_string_pretty(&preview)?);
            bail!("header detection failed; re-run with --header-row and --column");
        }
        Err(err) => Err(err.into()),
    }
}

pub fn cmd_parse_doc(file: &Path) -> Result<()> {
    let reader = File::open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let pages = sift_core::pages_from_json(reader)
        .with_context(|| format!("Failed to parse fragment dump {}", file.display()))?;

    let transactions = sift_core::parse_document(&pages, &ParserConfig::default())?;
    println!("{}", serde_json::to_string_pretty(&transactions)?);
    Ok(())
}

pub fn cmd_detect(file: &Path, delimiter: Option<char>) -> Result<()> {
    let matrix = read_matrix(file, delimiter)?;

    match detect_header(&matrix, &ParserConfig::default()) {
        Ok(detection) => {
            println!("{}", serde_json::to_string_pretty(&detection)?);
            Ok(())
        }
        Err(Error::HeaderDetectionFailed { preview }) => {
            eprintln!("No header row detected. First rows:");
            eprintln!("{}", serde_json::to_string_pretty(&preview)?);
            bail!("header detection failed");
        }
        Err(err) => Err(err.into()),
    }
}
