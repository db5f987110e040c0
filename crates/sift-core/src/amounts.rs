//! Amount normalization
//!
//! Turns currency-formatted text into a plain magnitude. Sign policy is
//! deliberately not decided here: the field resolver owns it, so
//! `normalize_amount` always returns an absolute value and
//! `is_negative_text` reports the markers it saw separately.

/// Currency symbols and codes stripped before numeric parsing.
/// Multi-character tokens come first so "Rs." is removed before "Rs".
const CURRENCY_TOKENS: &[&str] = &[
    "Rs.", "Rs", "INR", "USD", "EUR", "GBP", "₹", "$", "€", "£", "¥",
];

/// Parse a currency-formatted string into a non-negative magnitude.
///
/// Strips currency symbols, thousands separators, whitespace, and
/// enclosing accounting parentheses. Unparseable input and NaN both
/// normalize to 0.0 so the caller can treat the row as empty.
pub fn normalize_amount(raw: &str) -> f64 {
    let mut cleaned = raw.trim().to_string();
    for token in CURRENCY_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    cleaned.retain(|c| !c.is_whitespace() && c != ',');

    let cleaned = cleaned.trim_matches(|c| c == '(' || c == ')');

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v.abs(),
        _ => 0.0,
    }
}

/// Parse a currency-formatted string keeping its sign.
///
/// Used for reported balances, which can legitimately be negative
/// (overdrafts). Accounting parentheses count as a negative marker.
pub fn normalize_signed(raw: &str) -> f64 {
    let magnitude = normalize_amount(raw);
    if is_negative_text(raw) {
        -magnitude
    } else {
        magnitude
    }
}

/// Whether the raw text carries a negative marker: a leading minus sign
/// (after any currency symbol) or enclosing accounting parentheses.
pub fn is_negative_text(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.starts_with('(') && trimmed.ends_with(')') {
        return true;
    }
    let mut stripped = trimmed.to_string();
    for token in CURRENCY_TOKENS {
        stripped = stripped.replace(token, "");
    }
    stripped.trim_start().starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(normalize_amount("1234.56"), 1234.56);
        assert_eq!(normalize_amount("-123.45"), 123.45);
        assert_eq!(normalize_amount("0"), 0.0);
    }

    #[test]
    fn test_currency_and_separators() {
        assert_eq!(normalize_amount("₹12,345.00"), 12345.00);
        assert_eq!(normalize_amount("$1,234.56"), 1234.56);
        assert_eq!(normalize_amount("Rs. 2,500"), 2500.0);
        assert_eq!(normalize_amount("INR 99.99"), 99.99);
    }

    #[test]
    fn test_accounting_parentheses() {
        // Magnitude only; the resolver decides what the parens mean
        assert_eq!(normalize_amount("(500)"), 500.0);
        assert_eq!(normalize_amount("($1,000.00)"), 1000.0);
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(normalize_amount(""), 0.0);
        assert_eq!(normalize_amount("n/a"), 0.0);
        assert_eq!(normalize_amount("--"), 0.0);
    }

    #[test]
    fn test_negative_markers() {
        assert!(is_negative_text("-500"));
        assert!(is_negative_text("(500)"));
        assert!(is_negative_text("₹-500.00"));
        assert!(!is_negative_text("500"));
        assert!(!is_negative_text("$500"));
    }

    #[test]
    fn test_signed_balance() {
        assert_eq!(normalize_signed("-1,200.50"), -1200.50);
        assert_eq!(normalize_signed("(300)"), -300.0);
        assert_eq!(normalize_signed("4,500.00"), 4500.0);
    }
}
