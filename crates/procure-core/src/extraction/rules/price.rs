//! Price normalization for mixed European/US offer formatting.

/// Parse a price string (e.g. "1.759,01", "€50.00", "1,500.00 EUR").
///
/// When both separators appear, whichever comes last is the decimal
/// separator. A lone comma is always a decimal separator.
pub fn parse_price(raw: &str) -> Option<f64> {
    let stripped = raw.replace('€', "").replace("EUR", "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return None;
    }

    let normalized = match (stripped.rfind(','), stripped.rfind('.')) {
        // European: 1.234,56
        (Some(comma), Some(dot)) if dot < comma => stripped.replace('.', "").replace(',', "."),
        // US: 1,234.56
        (Some(_), Some(_)) => stripped.replace(',', ""),
        (Some(_), None) => stripped.replace(',', "."),
        _ => stripped.to_string(),
    };

    let compact: String = normalized.chars().filter(|c| !c.is_whitespace()).collect();
    compact.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize a price string to a plain number, `0.0` when absent or
/// unparseable.
pub fn normalize_price(raw: Option<&str>) -> f64 {
    raw.and_then(parse_price).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_absent() {
        assert_eq!(normalize_price(Some("")), 0.0);
        assert_eq!(normalize_price(Some("   ")), 0.0);
        assert_eq!(normalize_price(None), 0.0);
    }

    #[test]
    fn test_european_format() {
        assert_eq!(normalize_price(Some("1.759,01")), 1759.01);
        assert_eq!(normalize_price(Some("12.345.678,90")), 12345678.90);
        assert_eq!(normalize_price(Some("EUR 1.234,56")), 1234.56);
    }

    #[test]
    fn test_us_format() {
        assert_eq!(normalize_price(Some("1,500.00")), 1500.00);
        assert_eq!(normalize_price(Some("1,234,567.5")), 1234567.5);
    }

    #[test]
    fn test_currency_markers() {
        assert_eq!(normalize_price(Some("€50.00")), 50.00);
        assert_eq!(normalize_price(Some("50.00 €")), 50.00);
        assert_eq!(normalize_price(Some("99 EUR")), 99.0);
    }

    #[test]
    fn test_lone_comma_is_decimal() {
        assert_eq!(normalize_price(Some("50,5")), 50.5);
        assert_eq!(normalize_price(Some("1 234,56")), 1234.56);
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(normalize_price(Some("not a number")), 0.0);
        assert_eq!(normalize_price(Some("NaN")), 0.0);
        assert_eq!(normalize_price(Some("$12")), 0.0);
        assert_eq!(parse_price("n/a"), None);
    }

    #[test]
    fn test_parse_price_reports_success() {
        assert_eq!(parse_price("1500"), Some(1500.0));
        assert_eq!(parse_price("-3,5"), Some(-3.5));
    }
}
