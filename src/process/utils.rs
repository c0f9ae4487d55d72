use once_cell::sync::Lazy;
use regex::Regex;

/// First run of exactly four ASCII digits, not glued to other ASCII digits.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{4})(?:[^0-9]|$)").expect("year regex should compile")
});

/// Trim whitespace + strip a leading byte-order mark.
pub fn clean_str(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Comparison key for header matching: cleaned and lowercased.
pub fn normalize_header(raw: &str) -> String {
    clean_str(raw).replace('\u{feff}', "").to_lowercase()
}

/// Parse a cell as a number. Anything unusable (empty, garbage, NaN, inf,
/// negative) collapses to zero.
pub fn coerce_number(raw: &str) -> f64 {
    match clean_str(raw).parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Extracts a four-digit year from a season label like `"2015"`,
/// `"FF 2015 season"` or `"2015-16"`. Returns `None` if no run of exactly
/// four digits exists.
pub fn extract_year(label: &str) -> Option<i32> {
    YEAR_RE
        .captures(label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_str_strips_bom_and_whitespace() {
        assert_eq!(clean_str("\u{feff}Owner(s) "), "Owner(s)");
        assert_eq!(clean_str("  Wins\t"), "Wins");
    }

    #[test]
    fn normalize_header_is_case_insensitive() {
        assert_eq!(normalize_header("\u{feff} Points For"), "points for");
        assert_eq!(normalize_header("PF"), normalize_header("pf "));
    }

    #[test]
    fn coerce_number_defaults_to_zero() {
        assert_eq!(coerce_number("12"), 12.0);
        assert_eq!(coerce_number(" 1432.56 "), 1432.56);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("n/a"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
        assert_eq!(coerce_number("-3"), 0.0);
    }

    #[test]
    fn extract_year_finds_first_four_digit_run() {
        assert_eq!(extract_year("2015"), Some(2015));
        assert_eq!(extract_year("FF 2012 season"), Some(2012));
        assert_eq!(extract_year("2015-2016"), Some(2015));
        assert_eq!(extract_year("Season 12345"), None);
        assert_eq!(extract_year("1999x2020"), Some(1999));
        assert_eq!(extract_year("early years"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn extract_year_only_counts_ascii_digits() {
        // Arabic-Indic ٢٠١٥ is not a year; the ASCII one after it is.
        assert_eq!(extract_year("\u{0662}\u{0660}\u{0661}\u{0665} / 2016"), Some(2016));
        assert_eq!(extract_year("\u{0662}\u{0660}\u{0661}\u{0665}"), None);
    }
}
