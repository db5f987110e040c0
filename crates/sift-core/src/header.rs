//! Header detection
//!
//! Statement exports rarely start with the header row: bank name, account
//! holder, address, and date-range preamble come first. The detector scans
//! the early rows, resolves column roles by alias membership, and picks
//! the best-covered candidate. When nothing qualifies it fails with a raw
//! preview so an external UI can offer manual column mapping.

use tracing::debug;

use crate::config::ParserConfig;
use crate::error::{Error, Result};
use crate::matrix::RawMatrix;
use crate::models::{ColumnMap, ColumnRole};

/// A located header row and its role-to-column mapping.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HeaderDetection {
    pub header_row: usize,
    pub columns: ColumnMap,
}

/// Locate the best-scoring header row within the configured scan window.
///
/// A row is a candidate only if it resolves Date, Description, and at
/// least one amount-bearing role (Amount, Debit, or Credit). Among
/// candidates the highest role-coverage score wins; ties go to the
/// earliest row. No candidate fails with [`Error::HeaderDetectionFailed`]
/// carrying the first rows of the matrix.
pub fn detect_header(matrix: &RawMatrix, config: &ParserConfig) -> Result<HeaderDetection> {
    let mut best: Option<(usize, ColumnMap)> = None;

    for (index, row) in matrix.rows().iter().take(config.header_scan_rows).enumerate() {
        let columns = map_row_roles(row, config);
        if !is_candidate(&columns) {
            continue;
        }
        debug!(
            "Header candidate at row {} with coverage {}",
            index,
            columns.len()
        );
        // Strict comparison keeps the earliest row on ties
        let better = match &best {
            Some((_, current)) => columns.len() > current.len(),
            None => true,
        };
        if better {
            best = Some((index, columns));
        }
    }

    best.map(|(header_row, columns)| HeaderDetection {
        header_row,
        columns,
    })
    .ok_or_else(|| Error::HeaderDetectionFailed {
        preview: matrix.preview(config.preview_rows),
    })
}

fn is_candidate(columns: &ColumnMap) -> bool {
    columns.contains(ColumnRole::Date)
        && columns.contains(ColumnRole::Description)
        && (columns.contains(ColumnRole::Amount)
            || columns.contains(ColumnRole::Debit)
            || columns.contains(ColumnRole::Credit))
}

/// Resolve column roles for a single row.
///
/// Roles are walked in [`ColumnRole::PRIORITY`] order and each column
/// index is claimed by at most one role, so a "Dr/Cr" header lands on
/// Type instead of also satisfying the Debit alias.
fn map_row_roles(row: &[String], config: &ParserConfig) -> ColumnMap {
    let cells: Vec<String> = row.iter().map(|c| c.trim().to_lowercase()).collect();
    let mut columns = ColumnMap::new();
    let mut claimed = vec![false; cells.len()];

    for role in ColumnRole::PRIORITY {
        let found = cells.iter().enumerate().find(|(i, cell)| {
            !claimed[*i] && !cell.is_empty() && config.aliases.matches(role, cell)
        });
        if let Some((i, _)) = found {
            claimed[i] = true;
            columns.insert(role, i);
        }
    }

    columns
}
