//! Monetary value normalization
//!
//! Rates and billing amounts are stored as canonical non-negative decimal
//! strings with exactly two fraction digits ("40.00"). Every write path
//! (create, update, CSV import) funnels through these helpers so stored
//! values compare byte-for-byte in the changes summary.

use rust_decimal::Decimal;

/// Strip currency symbols, thousands separators and whitespace.
///
/// Spreadsheet exports produce values like `"$1,250.00"` or `"€ 45"`.
pub fn clean_currency(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Parse a monetary string into a canonical two-fraction-digit string.
///
/// Returns `None` for unparseable or negative input.
pub fn normalize(raw: &str) -> Option<String> {
    let cleaned = clean_currency(raw);
    let value: Decimal = cleaned.parse().ok()?;
    if value.is_sign_negative() {
        return None;
    }
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    Some(rounded.to_string())
}

/// Normalize a monetary string, falling back to `"0.00"`.
///
/// Used on import and on create where missing numeric fields default to zero.
pub fn normalize_or_zero(raw: &str) -> String {
    normalize(raw).unwrap_or_else(|| "0.00".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_plain_numbers() {
        assert_eq!(normalize("40"), Some("40.00".to_string()));
        assert_eq!(normalize("40.5"), Some("40.50".to_string()));
        assert_eq!(normalize("40.005"), Some("40.01".to_string()));
    }

    #[test]
    fn strips_currency_symbols_and_separators() {
        assert_eq!(normalize("$1,250.00"), Some("1250.00".to_string()));
        assert_eq!(normalize("€ 45"), Some("45.00".to_string()));
        assert_eq!(normalize("£9,999.99"), Some("9999.99".to_string()));
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        assert_eq!(normalize("abc"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("-10.00"), None);
        assert_eq!(normalize_or_zero("n/a"), "0.00");
    }
}
