//! Parser configuration
//!
//! Everything the pipeline needs that is not the statement itself lives
//! here: header alias tables, scan depths, and tolerances. All pipeline
//! functions take a `&ParserConfig` explicitly; there is no module-level
//! parser state.

use crate::models::ColumnRole;

/// Known header labels for each column role.
///
/// A cell matches an alias when it equals it after trim/lowercase, or when
/// it contains the alias as a substring and is longer than it (tolerates
/// compound headers like "Transaction Date").
#[derive(Debug, Clone)]
pub struct RoleAliases {
    pub date: Vec<String>,
    pub description: Vec<String>,
    pub amount: Vec<String>,
    pub debit: Vec<String>,
    pub credit: Vec<String>,
    pub balance: Vec<String>,
    pub kind: Vec<String>,
}

impl RoleAliases {
    pub fn for_role(&self, role: ColumnRole) -> &[String] {
        match role {
            ColumnRole::Date => &self.date,
            ColumnRole::Description => &self.description,
            ColumnRole::Amount => &self.amount,
            ColumnRole::Debit => &self.debit,
            ColumnRole::Credit => &self.credit,
            ColumnRole::Balance => &self.balance,
            ColumnRole::Type => &self.kind,
        }
    }

    /// Whether a lowercased, trimmed header cell matches `role`.
    pub fn matches(&self, role: ColumnRole, cell: &str) -> bool {
        self.for_role(role)
            .iter()
            .any(|alias| cell == alias || (cell.contains(alias.as_str()) && cell.len() > alias.len()))
    }
}

fn owned(aliases: &[&str]) -> Vec<String> {
    aliases.iter().map(|s| s.to_string()).collect()
}

impl Default for RoleAliases {
    fn default() -> Self {
        Self {
            date: owned(&[
                "date",
                "txn date",
                "transaction date",
                "value date",
                "posting date",
                "post date",
                "tran date",
                "booking date",
            ]),
            description: owned(&[
                "description",
                "narration",
                "particulars",
                "details",
                "transaction details",
                "transaction remarks",
                "remarks",
                "payee",
                "memo",
            ]),
            amount: owned(&["amount", "transaction amount", "amt"]),
            debit: owned(&[
                "debit",
                "withdrawal",
                "withdrawal amt",
                "debit amount",
                "paid out",
                "money out",
                "dr",
            ]),
            credit: owned(&[
                "credit",
                "deposit",
                "deposit amt",
                "credit amount",
                "paid in",
                "money in",
                "cr",
            ]),
            balance: owned(&[
                "balance",
                "running balance",
                "closing balance",
                "running bal",
                "bal",
            ]),
            kind: owned(&["type", "dr/cr", "cr/dr", "dr / cr", "debit/credit", "transaction type"]),
        }
    }
}

/// Tunable knobs for one parse invocation.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub aliases: RoleAliases,
    /// How many leading rows to scan for a header row
    pub header_scan_rows: usize,
    /// How many raw rows to attach to a header-detection failure
    pub preview_rows: usize,
    /// Vertical distance (document units) within which fragments are
    /// considered part of the same line
    pub line_tolerance: f64,
    /// Allowed drift (currency units) when checking a reported balance
    /// against the running balance
    pub balance_tolerance: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            aliases: RoleAliases::default(),
            header_scan_rows: 30,
            preview_rows: 20,
            line_tolerance: 5.0,
            balance_tolerance: 1.0,
        }
    }
}
