//! Field and amount-type resolution
//!
//! Given a data row and the column mapping, decides the transaction
//! amount and its direction. Which of the three strategies applies falls
//! directly out of which roles the mapping holds, so strategy selection
//! is a single pattern match.

use tracing::warn;

use crate::amounts::{is_negative_text, normalize_amount};
use crate::models::{ColumnMap, ColumnRole, TransactionKind};

/// Values in an explicit type column that mean money coming in.
const INCOME_KEYWORDS: &[&str] = &["credit", "cr", "deposit", "income"];

/// How a row's amount and direction are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountStrategy {
    /// Separate debit and credit columns; whichever is positive wins
    DualColumn { debit: usize, credit: usize },
    /// One amount column plus an explicit type column
    TypedAmount { amount: usize, kind: usize },
    /// One ambiguous amount column; direction comes from embedded
    /// markers or the numeric sign
    BareAmount { amount: usize },
}

impl AmountStrategy {
    /// Select the strategy the mapping supports, if any.
    pub fn from_columns(columns: &ColumnMap) -> Option<Self> {
        let debit = columns.get(ColumnRole::Debit);
        let credit = columns.get(ColumnRole::Credit);
        let kind = columns.get(ColumnRole::Type);
        // A lone debit or credit column degrades to a bare amount column
        let amount = columns
            .get(ColumnRole::Amount)
            .or(debit)
            .or(credit);

        match (debit, credit, amount, kind) {
            (Some(debit), Some(credit), _, _) => Some(Self::DualColumn { debit, credit }),
            (_, _, Some(amount), Some(kind)) => Some(Self::TypedAmount { amount, kind }),
            (_, _, Some(amount), None) => Some(Self::BareAmount { amount }),
            _ => None,
        }
    }
}

/// A resolved amount with its direction and how confidently it was read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAmount {
    pub amount: f64,
    pub kind: TransactionKind,
    pub confidence: f64,
}

/// Resolve a single row. `None` means the row is invalid for this
/// strategy and should be skipped, never that the parse failed.
pub fn resolve_amount(strategy: &AmountStrategy, row: &[String]) -> Option<ResolvedAmount> {
    match *strategy {
        AmountStrategy::DualColumn { debit, credit } => {
            let debit_amount = normalize_amount(cell(row, debit));
            let credit_amount = normalize_amount(cell(row, credit));

            if debit_amount > 0.0 && credit_amount > 0.0 {
                warn!(
                    "Row has both debit ({}) and credit ({}) populated; skipping",
                    debit_amount, credit_amount
                );
                return None;
            }
            if debit_amount > 0.0 {
                Some(ResolvedAmount {
                    amount: debit_amount,
                    kind: TransactionKind::Expense,
                    confidence: 0.95,
                })
            } else if credit_amount > 0.0 {
                Some(ResolvedAmount {
                    amount: credit_amount,
                    kind: TransactionKind::Income,
                    confidence: 0.95,
                })
            } else {
                None
            }
        }

        AmountStrategy::TypedAmount { amount, kind } => {
            let magnitude = normalize_amount(cell(row, amount));
            if magnitude <= 0.0 {
                return None;
            }
            let kind_text = cell(row, kind).trim().to_lowercase();
            let kind = if INCOME_KEYWORDS
                .iter()
                .any(|kw| kind_text == *kw || kind_text.contains(kw))
            {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            Some(ResolvedAmount {
                amount: magnitude,
                kind,
                confidence: 0.9,
            })
        }

        AmountStrategy::BareAmount { amount } => {
            let raw = cell(row, amount);
            let lowered = raw.trim().to_lowercase();
            if lowered.is_empty() {
                return None;
            }
            let magnitude = normalize_amount(&strip_kind_markers(&lowered));
            if magnitude <= 0.0 {
                return None;
            }

            // Embedded markers beat the numeric sign
            let (kind, confidence) = if lowered.contains("cr") {
                (TransactionKind::Income, 0.9)
            } else if lowered.contains("dr") || lowered.contains("debit") {
                (TransactionKind::Expense, 0.9)
            } else if is_negative_text(raw) {
                (TransactionKind::Expense, 0.8)
            } else {
                // No marker, non-negative value: default to Expense.
                // Low confidence so callers can route these to review.
                (TransactionKind::Expense, 0.5)
            };

            Some(ResolvedAmount {
                amount: magnitude,
                kind,
                confidence,
            })
        }
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|s| s.as_str()).unwrap_or("")
}

/// Remove embedded cr/dr markers so the remainder parses as a number.
fn strip_kind_markers(lowered: &str) -> String {
    let stripped: String = lowered
        .chars()
        .filter(|c| !c.is_ascii_alphabetic())
        .collect();
    stripped
        .trim()
        .trim_end_matches('.')
        .trim()
        .to_string()
}
