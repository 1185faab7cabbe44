//! Tolerant cell coercion.
//!
//! Spreadsheet exports are loosely typed: numbers arrive as text, cells go
//! missing, and free-text fields carry stray whitespace. Every helper here
//! degrades to a default instead of failing — a malformed cell must never
//! abort a run.

/// Trimmed text content of a cell; missing cell → empty string.
pub fn text(cell: Option<&str>) -> String {
    cell.map(str::trim).unwrap_or_default().to_string()
}

/// Numeric coercion: trimmed, thousands separators stripped, parsed as f64.
/// Missing, empty, non-numeric, or non-finite cells → `None`.
pub fn number(cell: Option<&str>) -> Option<f64> {
    let raw = cell?.trim();
    if raw.is_empty() {
        return None;
    }
    let cleaned = raw.replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Numeric coercion with default substitution: unparseable → 0.
pub fn number_or_zero(cell: Option<&str>) -> f64 {
    number(cell).unwrap_or(0.0)
}

/// Non-negative integer coercion (publication counts and the like).
pub fn count(cell: Option<&str>) -> u32 {
    number(cell).map(|v| v.max(0.0) as u32).unwrap_or(0)
}

/// Year coercion: the fractional part is dropped. Unparseable → `None`.
pub fn year(cell: Option<&str>) -> Option<i32> {
    number(cell).map(|v| v as i32)
}

/// A membership flag is set only when the cell coerces to exactly 1.
/// 0, missing, and non-numeric cells are all "not set".
pub fn is_flag_set(cell: Option<&str>) -> bool {
    number(cell) == Some(1.0)
}

/// Comma-delimited keyword list: split, trim, drop empty pieces.
/// Missing cell → empty list.
pub fn keyword_list(cell: Option<&str>) -> Vec<String> {
    match cell {
        None => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_trims_and_defaults() {
        assert_eq!(text(Some("  내과  ")), "내과");
        assert_eq!(text(Some("")), "");
        assert_eq!(text(None), "");
    }

    #[test]
    fn number_coercion() {
        assert_eq!(number(Some("500000000")), Some(500_000_000.0));
        assert_eq!(number(Some(" 2025.0 ")), Some(2025.0));
        assert_eq!(number(Some("500,000,000")), Some(500_000_000.0));
        assert_eq!(number(Some("n/a")), None);
        assert_eq!(number(Some("")), None);
        assert_eq!(number(Some("NaN")), None);
        assert_eq!(number(None), None);
    }

    #[test]
    fn number_or_zero_substitutes_default() {
        assert_eq!(number_or_zero(Some("abc")), 0.0);
        assert_eq!(number_or_zero(None), 0.0);
        assert_eq!(number_or_zero(Some("3.5")), 3.5);
    }

    #[test]
    fn count_clamps_negative() {
        assert_eq!(count(Some("12")), 12);
        assert_eq!(count(Some("12.0")), 12);
        assert_eq!(count(Some("-3")), 0);
        assert_eq!(count(None), 0);
    }

    #[test]
    fn year_drops_fraction() {
        assert_eq!(year(Some("1995")), Some(1995));
        assert_eq!(year(Some("2025.0")), Some(2025));
        assert_eq!(year(Some("unknown")), None);
    }

    #[test]
    fn flag_requires_exactly_one() {
        assert!(is_flag_set(Some("1")));
        assert!(is_flag_set(Some("1.0")));
        assert!(!is_flag_set(Some("0")));
        assert!(!is_flag_set(Some("2")));
        assert!(!is_flag_set(Some("yes")));
        assert!(!is_flag_set(None));
    }

    #[test]
    fn keyword_list_splits_and_cleans() {
        assert_eq!(
            keyword_list(Some("면역, 백신 ,  마이크로바이옴")),
            vec!["면역", "백신", "마이크로바이옴"]
        );
        assert_eq!(keyword_list(Some(" , ,")), Vec::<String>::new());
        assert_eq!(keyword_list(None), Vec::<String>::new());
    }
}
