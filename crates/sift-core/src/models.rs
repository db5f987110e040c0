//! Domain models for sift

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a transaction moves money into or out of the account.
///
/// The sign of a transaction lives here, never in the amount: `amount` on
/// [`NormalizedTransaction`] is always a non-negative magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "credit" => Ok(Self::Income),
            "expense" | "debit" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed statement row, normalized for downstream categorization and
/// persistence (both handled outside this crate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    /// ISO calendar date; serializes as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub description: String,
    /// Non-negative magnitude; direction is carried by `kind`
    pub amount: f64,
    pub kind: TransactionKind,
    /// Left empty here; categorization is a separate concern
    pub category: String,
    /// 0.0–1.0, how certain the field resolution was for this row
    pub confidence: f64,
}

/// Semantic meaning of a statement column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Date,
    Description,
    Amount,
    Debit,
    Credit,
    Balance,
    Type,
}

impl ColumnRole {
    /// Resolution priority during header detection. `Type` outranks
    /// `Debit`/`Credit` so a "Dr/Cr" header is claimed as the type column
    /// before the short debit/credit aliases can grab it.
    pub const PRIORITY: [ColumnRole; 7] = [
        ColumnRole::Date,
        ColumnRole::Description,
        ColumnRole::Type,
        ColumnRole::Debit,
        ColumnRole::Credit,
        ColumnRole::Amount,
        ColumnRole::Balance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::Balance => "balance",
            Self::Type => "type",
        }
    }
}

impl std::str::FromStr for ColumnRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "description" => Ok(Self::Description),
            "amount" => Ok(Self::Amount),
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            "balance" => Ok(Self::Balance),
            "type" => Ok(Self::Type),
            _ => Err(format!("Unknown column role: {}", s)),
        }
    }
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mapping from column roles to column indices. Roles that were not found
/// are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    columns: BTreeMap<ColumnRole, usize>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: ColumnRole, index: usize) {
        self.columns.insert(role, index);
    }

    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.columns.get(&role).copied()
    }

    pub fn contains(&self, role: ColumnRole) -> bool {
        self.columns.contains_key(&role)
    }

    /// Role-coverage score: how many roles resolved to a column.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnRole, usize)> + '_ {
        self.columns.iter().map(|(r, i)| (*r, *i))
    }
}

impl FromIterator<(ColumnRole, usize)> for ColumnMap {
    fn from_iter<T: IntoIterator<Item = (ColumnRole, usize)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// A positioned text fragment extracted from one page of a document.
///
/// Decryption and text extraction happen upstream; this crate only sees
/// the resulting fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub height: f64,
}

/// All text fragments of a single document page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub fragments: Vec<TextFragment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_kind_round_trip() {
        assert_eq!(TransactionKind::Income.as_str(), "income");
        assert_eq!(
            TransactionKind::from_str("Expense").unwrap(),
            TransactionKind::Expense
        );
        assert_eq!(
            TransactionKind::from_str("credit").unwrap(),
            TransactionKind::Income
        );
        assert!(TransactionKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_column_map_lookup() {
        let mut map = ColumnMap::new();
        map.insert(ColumnRole::Date, 0);
        map.insert(ColumnRole::Amount, 2);

        assert_eq!(map.get(ColumnRole::Date), Some(0));
        assert_eq!(map.get(ColumnRole::Debit), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_column_role_from_str() {
        assert_eq!(ColumnRole::from_str("Debit").unwrap(), ColumnRole::Debit);
        assert!(ColumnRole::from_str("merchant").is_err());
    }
}
