//! Balance consistency inference
//!
//! Columnar document statements report an amount and a running balance
//! but no direction. The inferencer carries a running balance through the
//! statement and picks whichever direction explains the reported figure.
//! The reported balance always becomes the new running balance, so drift
//! in the statement is never compounded by the inference.

use tracing::debug;

use crate::document::DocumentStatement;
use crate::models::TransactionKind;

/// Fill in `kind` for every line that left it undetermined.
///
/// Seeds the running balance from the statement's opening balance (0 if
/// absent). Lines with a known kind only advance the running balance.
pub fn infer_kinds(statement: &mut DocumentStatement, tolerance: f64) {
    let mut running = statement.opening_balance.unwrap_or(0.0);

    for line in &mut statement.lines {
        if line.kind.is_some() {
            running = line.balance;
            continue;
        }

        let if_income = running + line.amount;
        let if_expense = running - line.amount;

        let (kind, confidence) = if (if_income - line.balance).abs() <= tolerance {
            (TransactionKind::Income, 0.85)
        } else if (if_expense - line.balance).abs() <= tolerance {
            (TransactionKind::Expense, 0.85)
        } else {
            // Neither expectation matches; fall back to balance direction
            debug!(
                "Balance {} matches neither {} nor {}; inferring from direction",
                line.balance, if_income, if_expense
            );
            if line.balance > running {
                (TransactionKind::Income, 0.6)
            } else {
                (TransactionKind::Expense, 0.6)
            }
        };

        line.kind = Some(kind);
        line.confidence = confidence;
        running = line.balance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StatementLine;
    use chrono::NaiveDate;

    fn line(amount: f64, balance: f64, kind: Option<TransactionKind>) -> StatementLine {
        StatementLine {
            date: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
            description: "TEST".to_string(),
            amount,
            kind,
            balance,
            confidence: 0.0,
        }
    }

    #[test]
    fn test_income_within_tolerance() {
        let mut statement = DocumentStatement {
            opening_balance: Some(1000.0),
            lines: vec![line(200.0, 1200.0, None)],
        };
        infer_kinds(&mut statement, 1.0);
        assert_eq!(statement.lines[0].kind, Some(TransactionKind::Income));
        assert_eq!(statement.lines[0].confidence, 0.85);
    }

    #[test]
    fn test_expense_within_tolerance() {
        let mut statement = DocumentStatement {
            opening_balance: Some(1000.0),
            lines: vec![line(200.0, 800.0, None)],
        };
        infer_kinds(&mut statement, 1.0);
        assert_eq!(statement.lines[0].kind, Some(TransactionKind::Expense));
    }

    #[test]
    fn test_rounding_drift_absorbed() {
        let mut statement = DocumentStatement {
            opening_balance: Some(1000.0),
            lines: vec![line(200.0, 1200.60, None)],
        };
        infer_kinds(&mut statement, 1.0);
        assert_eq!(statement.lines[0].kind, Some(TransactionKind::Income));
    }

    #[test]
    fn test_fallback_on_direction() {
        // Reported balance explains neither expectation
        let mut statement = DocumentStatement {
            opening_balance: Some(1000.0),
            lines: vec![line(200.0, 1500.0, None)],
        };
        infer_kinds(&mut statement, 1.0);
        assert_eq!(statement.lines[0].kind, Some(TransactionKind::Income));
        assert_eq!(statement.lines[0].confidence, 0.6);
    }

    #[test]
    fn test_reported_balance_is_adopted_not_computed() {
        // The second line's inference must start from 8500, not from
        // whatever 10000 - 1500 would have been if the statement drifted
        let mut statement = DocumentStatement {
            opening_balance: Some(10000.0),
            lines: vec![line(1500.0, 8500.0, None), line(300.0, 8800.0, None)],
        };
        infer_kinds(&mut statement, 1.0);
        assert_eq!(statement.lines[0].kind, Some(TransactionKind::Expense));
        assert_eq!(statement.lines[1].kind, Some(TransactionKind::Income));
    }

    #[test]
    fn test_known_kinds_only_advance_running_balance() {
        let mut statement = DocumentStatement {
            opening_balance: Some(1000.0),
            lines: vec![
                line(500.0, 1500.0, Some(TransactionKind::Income)),
                line(200.0, 1300.0, None),
            ],
        };
        infer_kinds(&mut statement, 1.0);
        assert_eq!(statement.lines[0].kind, Some(TransactionKind::Income));
        assert_eq!(statement.lines[1].kind, Some(TransactionKind::Expense));
    }

    #[test]
    fn test_missing_opening_balance_seeds_zero() {
        let mut statement = DocumentStatement {
            opening_balance: None,
            lines: vec![line(250.0, 250.0, None)],
        };
        infer_kinds(&mut statement, 1.0);
        assert_eq!(statement.lines[0].kind, Some(TransactionKind::Income));
    }
}
