//! Parse pipeline
//!
//! Orchestrates the stages: source matrix → header detection → per-row
//! field resolution → cleanup, and the document variant with line
//! reconstruction and balance inference. Row-level problems are logged
//! and skipped; only statement-level outcomes surface as errors.

use tracing::{debug, info};

use crate::balance::infer_kinds;
use crate::config::ParserConfig;
use crate::document::{extract_statement, reconstruct_text, DocumentPatterns};
use crate::error::{Error, Result};
use crate::header::detect_header;
use crate::matrix::RawMatrix;
use crate::models::{ColumnMap, ColumnRole, NormalizedTransaction, Page, TransactionKind};
use crate::resolve::{resolve_amount, AmountStrategy};

/// Rows whose first cell or description starts with one of these are
/// statement furniture, not transactions.
const SUMMARY_MARKERS: &[&str] = &["total", "opening", "closing", "balance"];

/// Whether a cell or line is a summary/balance marker rather than data.
pub fn is_summary_marker(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    SUMMARY_MARKERS
        .iter()
        .any(|marker| lowered.starts_with(marker))
}

/// Parse a tabular statement end to end: detect the header, resolve every
/// data row, clean up, and sort.
pub fn parse_matrix(
    matrix: &RawMatrix,
    config: &ParserConfig,
) -> Result<Vec<NormalizedTransaction>> {
    let detection = detect_header(matrix, config)?;
    info!(
        "Detected header at row {} covering {} roles",
        detection.header_row,
        detection.columns.len()
    );
    parse_with_mapping(matrix, detection.header_row, &detection.columns, config)
}

/// Manual-mapping entry point: skips header detection and re-enters the
/// pipeline at the field resolver. Every downstream stage is identical to
/// the auto-detected path.
pub fn parse_with_mapping(
    matrix: &RawMatrix,
    header_row: usize,
    columns: &ColumnMap,
    _config: &ParserConfig,
) -> Result<Vec<NormalizedTransaction>> {
    let strategy = AmountStrategy::from_columns(columns).ok_or_else(|| {
        Error::UnsupportedFormat("column mapping carries no amount-bearing role".into())
    })?;
    let date_col = columns
        .get(ColumnRole::Date)
        .ok_or_else(|| Error::UnsupportedFormat("column mapping carries no date role".into()))?;
    let description_col = columns.get(ColumnRole::Description);

    let mut transactions = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in matrix.rows().iter().enumerate().skip(header_row + 1) {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let description = description_col
            .and_then(|col| row.get(col))
            .map(|s| s.trim())
            .unwrap_or("");
        let first_cell = row.first().map(|s| s.trim()).unwrap_or("");
        if is_summary_marker(first_cell) || is_summary_marker(description) {
            debug!("Row {}: summary marker, skipping", index);
            continue;
        }

        let date_text = row.get(date_col).map(|s| s.as_str()).unwrap_or("");
        let Some(date) = crate::dates::normalize_date(date_text) else {
            debug!("Row {}: unparseable date '{}', skipping", index, date_text);
            skipped += 1;
            continue;
        };

        let Some(resolved) = resolve_amount(&strategy, row) else {
            debug!("Row {}: no resolvable amount, skipping", index);
            skipped += 1;
            continue;
        };
        if resolved.amount <= 0.0 {
            continue;
        }

        transactions.push(NormalizedTransaction {
            date,
            description: collapse_whitespace(description),
            amount: resolved.amount,
            kind: resolved.kind,
            category: String::new(),
            confidence: resolved.confidence,
        });
    }

    finish(transactions, skipped)
}

/// Parse a document statement from positioned text fragments.
pub fn parse_document(
    pages: &[Page],
    config: &ParserConfig,
) -> Result<Vec<NormalizedTransaction>> {
    let patterns = DocumentPatterns::new()?;
    let text = reconstruct_text(pages, config.line_tolerance);
    let mut statement = extract_statement(&text, &patterns);
    infer_kinds(&mut statement, config.balance_tolerance);

    let transactions = statement
        .lines
        .into_iter()
        .filter(|line| line.amount > 0.0)
        .map(|line| NormalizedTransaction {
            date: line.date,
            description: collapse_whitespace(&line.description),
            amount: line.amount,
            // infer_kinds leaves no line undetermined
            kind: line.kind.unwrap_or(TransactionKind::Expense),
            category: String::new(),
            confidence: line.confidence,
        })
        .collect();

    finish(transactions, 0)
}

/// Shared tail of every pipeline: reject empty results, sort ascending by
/// date (stable, so intra-day statement order is preserved).
fn finish(
    mut transactions: Vec<NormalizedTransaction>,
    skipped: usize,
) -> Result<Vec<NormalizedTransaction>> {
    if transactions.is_empty() {
        return Err(Error::NoTransactionsParsed);
    }
    transactions.sort_by_key(|t| t.date);
    info!(
        "Parsed {} transactions ({} rows skipped)",
        transactions.len(),
        skipped
    );
    Ok(transactions)
}

/// Collapse internal whitespace runs to single spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
