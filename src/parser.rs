//! Coercion of raw CSV cells into the fields of a visit record.

/// Cell values read as missing rather than as text.
static MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns `true` for an empty cell or one of the usual missing-value markers.
/// Matching is exact, so a whitespace-only cell is not missing.
pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Parses a cell as an integer, falling back to a finite float truncated
/// toward zero (`"2020.0"` is a valid year). Returns `None` when neither works.
pub fn parse_integer(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(v) = cell.parse::<i64>() {
        return Some(v);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() < i64::MAX as f64 => Some(v.trunc() as i64),
        _ => None,
    }
}

/// Parses a year cell. Rows whose year does not parse are dropped by the loader.
pub fn parse_year(cell: &str) -> Option<i32> {
    parse_integer(cell).and_then(|v| i32::try_from(v).ok())
}

/// Parses a count cell. Unparsable or negative values become 0.
pub fn parse_count(cell: &str) -> u64 {
    parse_integer(cell)
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_missing_markers() {
        for cell in ["", "NA", "N/A", "null", "None", "nan", "<NA>", "#N/A"] {
            assert!(is_missing(cell), "{cell:?} should be missing");
        }
        assert!(!is_missing("   "));
        assert!(!is_missing("Centro"));
        assert!(!is_missing("na"));
    }

    #[test]
    fn test_parse_integer_plain_and_float() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer(" 7 "), Some(7));
        assert_eq!(parse_integer("2020.0"), Some(2020));
        assert_eq!(parse_integer("12.9"), Some(12));
    }

    #[test]
    fn test_parse_integer_rejects_garbage() {
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("NaN"), None);
        assert_eq!(parse_integer("inf"), None);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2021"), Some(2021));
        assert_eq!(parse_year("n/a"), None);
        assert_eq!(parse_year("99999999999"), None);
    }

    #[test]
    fn test_parse_count_coerces_to_zero() {
        assert_eq!(parse_count("150"), 150);
        assert_eq!(parse_count("x"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-3"), 0);
    }
}
