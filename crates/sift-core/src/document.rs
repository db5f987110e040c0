//! Document statement parsing
//!
//! Document extraction hands this module positioned text fragments, not
//! rows. Reconstruction folds the fragments into reading-order lines
//! (top-to-bottom, left-to-right, with a vertical tolerance), then each
//! line is matched against the supported transaction patterns. Lines
//! that match nothing become continuations of the previous transaction's
//! description.

use std::io::Read;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::amounts::{normalize_amount, normalize_signed};
use crate::dates::normalize_date;
use crate::error::Result;
use crate::models::{Page, TextFragment, TransactionKind};
use crate::pipeline::is_summary_marker;

/// A transaction line lifted from document text. `kind` stays `None` for
/// the columnar form until the balance inferencer fills it in.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementLine {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub kind: Option<TransactionKind>,
    pub balance: f64,
    pub confidence: f64,
}

/// Parsed document statement: the detected opening balance (if any) and
/// the transaction lines in statement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStatement {
    pub opening_balance: Option<f64>,
    pub lines: Vec<StatementLine>,
}

/// Compiled transaction-line patterns. Built per parse; no global state.
#[derive(Debug)]
pub struct DocumentPatterns {
    /// `date description amount Dr/Cr balance [Dr/Cr]`
    dual: Regex,
    /// `date description valueDate amount balance`; type undetermined
    columnar: Regex,
    /// Opening balance marker with a trailing figure
    opening: Regex,
}

impl DocumentPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dual: Regex::new(
                r"(?x)^
                (?P<date>\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\s+
                (?P<desc>.+?)\s+
                (?P<amount>[\d,]+(?:\.\d+)?)\s*
                (?P<marker>[DdCc][Rr])\.?\s+
                (?P<balance>[\d,]+(?:\.\d+)?)
                (?:\s*(?P<balmarker>[DdCc][Rr])\.?)?
                $",
            )?,
            columnar: Regex::new(
                r"(?x)^
                (?P<date>\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\s+
                (?P<desc>.+?)\s+
                (?P<valuedate>\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\s+
                (?P<amount>[\d,]+\.\d{2})\s+
                (?P<balance>-?[\d,]+\.\d{2})
                $",
            )?,
            opening: Regex::new(
                r"(?i)(?:opening\s+balance|balance\s+b/f|brought\s+forward)\D*(?P<amount>-?[\d,]+(?:\.\d+)?)",
            )?,
        })
    }
}

/// Deserialize a fragment dump: a JSON array of pages, each holding
/// positioned text fragments.
pub fn pages_from_json<R: Read>(reader: R) -> Result<Vec<Page>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Reconstruct one page's fragments into logical text lines.
///
/// Fragments are sorted by descending `y` (page top first), then folded
/// into line groups: the vertical gap from the previous fragment, not the
/// line's first one, decides whether a new line starts, so gradual drift
/// within a line never splits it. Each group is ordered by ascending `x`
/// before joining, keeping jittered same-line fragments left to right.
pub fn reconstruct_lines(page: &Page, tolerance: f64) -> Vec<String> {
    let mut fragments: Vec<&TextFragment> = page
        .fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .collect();

    // Strict (y desc, x asc) ordering; tolerance grouping belongs to the
    // fold below, not the comparator
    fragments.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    struct Fold<'a> {
        lines: Vec<Vec<&'a TextFragment>>,
        current: Vec<&'a TextFragment>,
        prev_y: f64,
    }

    let folded = fragments.into_iter().fold(None::<Fold>, |acc, fragment| {
        match acc {
            None => Some(Fold {
                lines: Vec::new(),
                current: vec![fragment],
                prev_y: fragment.y,
            }),
            Some(mut fold) => {
                if (fold.prev_y - fragment.y) > tolerance {
                    let finished = std::mem::replace(&mut fold.current, vec![fragment]);
                    fold.lines.push(finished);
                } else {
                    fold.current.push(fragment);
                }
                fold.prev_y = fragment.y;
                Some(fold)
            }
        }
    });

    let mut groups = match folded {
        Some(mut fold) => {
            fold.lines.push(fold.current);
            fold.lines
        }
        None => Vec::new(),
    };

    groups
        .iter_mut()
        .map(|group| {
            group.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            group
                .iter()
                .map(|f| f.text.trim())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Reconstruct every page and join them into a single text block, pages
/// in document order, lines separated by line breaks.
pub fn reconstruct_text(pages: &[Page], tolerance: f64) -> String {
    pages
        .iter()
        .flat_map(|page| reconstruct_lines(page, tolerance))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Match reconstructed text line-by-line against the transaction
/// patterns. Unmatched, non-empty, non-summary lines are appended to the
/// previous transaction's description.
pub fn extract_statement(text: &str, patterns: &DocumentPatterns) -> DocumentStatement {
    let mut statement = DocumentStatement::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if statement.opening_balance.is_none() && statement.lines.is_empty() {
            if let Some(captures) = patterns.opening.captures(line) {
                let opening = normalize_signed(&captures["amount"]);
                debug!("Detected opening balance {}", opening);
                statement.opening_balance = Some(opening);
                continue;
            }
        }

        if let Some(captures) = patterns.dual.captures(line) {
            let Some(date) = normalize_date(&captures["date"]) else {
                debug!("Skipping line with unparseable date: {}", line);
                continue;
            };
            let kind = if captures["marker"].to_lowercase() == "cr" {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let mut balance = normalize_amount(&captures["balance"]);
            // A trailing Dr on the balance column means overdrawn
            if let Some(marker) = captures.name("balmarker") {
                if marker.as_str().to_lowercase() == "dr" {
                    balance = -balance;
                }
            }
            statement.lines.push(StatementLine {
                date,
                description: captures["desc"].to_string(),
                amount: normalize_amount(&captures["amount"]),
                kind: Some(kind),
                balance,
                confidence: 0.9,
            });
            continue;
        }

        if let Some(captures) = patterns.columnar.captures(line) {
            let Some(date) = normalize_date(&captures["date"]) else {
                debug!("Skipping line with unparseable date: {}", line);
                continue;
            };
            statement.lines.push(StatementLine {
                date,
                description: captures["desc"].to_string(),
                amount: normalize_amount(&captures["amount"]),
                kind: None,
                balance: normalize_signed(&captures["balance"]),
                confidence: 0.0,
            });
            continue;
        }

        if is_summary_marker(line) {
            continue;
        }

        // Continuation of the previous transaction's description
        if let Some(last) = statement.lines.last_mut() {
            last.description.push(' ');
            last.description.push_str(line);
        }
    }

    statement
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, x: f64, y: f64) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            x,
            y,
            height: 10.0,
        }
    }

    #[test]
    fn test_reconstruct_reading_order() {
        // Fragments arrive out of order; y grows toward the page top
        let page = Page {
            fragments: vec![
                fragment("balance", 200.0, 700.0),
                fragment("01/04/2023", 10.0, 680.0),
                fragment("date", 10.0, 700.0),
                fragment("9,500.00", 200.0, 681.0),
            ],
        };
        let lines = reconstruct_lines(&page, 5.0);
        assert_eq!(lines, vec!["date balance", "01/04/2023 9,500.00"]);
    }

    #[test]
    fn test_reconstruct_tolerance_groups_jittered_fragments() {
        let page = Page {
            fragments: vec![
                fragment("a", 0.0, 100.0),
                fragment("b", 50.0, 99.0),
                fragment("c", 100.0, 101.0),
            ],
        };
        assert_eq!(reconstruct_lines(&page, 5.0), vec!["a b c"]);
        // With zero tolerance each fragment is its own line
        assert_eq!(reconstruct_lines(&page, 0.0).len(), 3);
    }

    #[test]
    fn test_reconstruct_groups_gradual_vertical_drift() {
        // Each gap is within tolerance even though the span from the
        // first fragment exceeds it; the line must stay whole
        let page = Page {
            fragments: vec![
                fragment("a", 0.0, 100.0),
                fragment("b", 50.0, 96.0),
                fragment("c", 100.0, 92.0),
            ],
        };
        assert_eq!(reconstruct_lines(&page, 5.0), vec!["a b c"]);
    }

    #[test]
    fn test_pages_from_json() {
        let dump = r#"[{"fragments": [{"text": "hello", "x": 1.0, "y": 2.0}]}]"#;
        let pages = pages_from_json(dump.as_bytes()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].fragments[0].text, "hello");

        assert!(matches!(
            pages_from_json("not json".as_bytes()),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn test_reconstruct_empty_page() {
        assert!(reconstruct_lines(&Page::default(), 5.0).is_empty());
    }

    #[test]
    fn test_dual_pattern_line() {
        let patterns = DocumentPatterns::new().unwrap();
        let text = "01/04/2023 UPI/GROCERY MART 1,250.00 Dr 8,750.00";
        let statement = extract_statement(text, &patterns);
        assert_eq!(statement.lines.len(), 1);
        let line = &statement.lines[0];
        assert_eq!(line.kind, Some(TransactionKind::Expense));
        assert_eq!(line.amount, 1250.0);
        assert_eq!(line.balance, 8750.0);
        assert_eq!(line.description, "UPI/GROCERY MART");
    }

    #[test]
    fn test_dual_pattern_overdrawn_balance() {
        let patterns = DocumentPatterns::new().unwrap();
        let text = "02/04/2023 LOAN EMI 5,000.00 Dr 1,200.00 Dr";
        let statement = extract_statement(text, &patterns);
        assert_eq!(statement.lines[0].balance, -1200.0);
    }

    #[test]
    fn test_columnar_pattern_leaves_kind_unknown() {
        let patterns = DocumentPatterns::new().unwrap();
        let text = "05/04/2023 NEFT TRANSFER 05/04/2023 2,000.00 10,750.00";
        let statement = extract_statement(text, &patterns);
        assert_eq!(statement.lines.len(), 1);
        assert_eq!(statement.lines[0].kind, None);
        assert_eq!(statement.lines[0].amount, 2000.0);
    }

    #[test]
    fn test_opening_balance_detection() {
        let patterns = DocumentPatterns::new().unwrap();
        let text = "Opening Balance: 10,000.00\n01/04/2023 UPI/SHOP 500.00 Dr 9,500.00";
        let statement = extract_statement(text, &patterns);
        assert_eq!(statement.opening_balance, Some(10000.0));
        assert_eq!(statement.lines.len(), 1);
    }

    #[test]
    fn test_continuation_lines_merge() {
        let patterns = DocumentPatterns::new().unwrap();
        let text = "01/04/2023 NEFT FROM 01/04/2023 2,000.00 12,000.00\nACME PAYROLL SERVICES REF 9912";
        let statement = extract_statement(text, &patterns);
        assert_eq!(statement.lines.len(), 1);
        assert_eq!(
            statement.lines[0].description,
            "NEFT FROM ACME PAYROLL SERVICES REF 9912"
        );
    }

    #[test]
    fn test_summary_lines_are_not_continuations() {
        let patterns = DocumentPatterns::new().unwrap();
        let text = "01/04/2023 SHOP 500.00 Dr 9,500.00\nClosing Balance 9,500.00";
        let statement = extract_statement(text, &patterns);
        assert_eq!(statement.lines[0].description, "SHOP");
    }
}
