//! ICD-10 code helpers.
//!
//! UMLS returns block-level ICD-10-CM atoms whose code is a range such as
//! `A00-A09`. [`expand_range`] turns those into the individual codes an
//! analyst can act on:
//!
//! - `A00-A03` expands to `A00, A01, A02, A03` (zero padding is kept)
//! - `S00.0-S00.2` expands to `S00.0, S00.1, S00.2`
//! - `A00-B99` (different prefixes) yields only the endpoints `A00, B99`
//! - endpoints [`MAX_RANGE_SPAN`] or more apart are returned unexpanded
//!
//! Plain codes pass through unchanged.

use std::collections::HashSet;

/// [`expand_range`] does not enumerate ranges whose `end - start` reaches this.
pub const MAX_RANGE_SPAN: u64 = 1000;

/// Splits `start-end` into its two trimmed endpoints.
///
/// Returns `None` for plain codes and for malformed notations
/// (empty endpoint, more than one dash).
pub fn split_range(code: &str) -> Option<(&str, &str)> {
    let (start, end) = code.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() || end.contains('-') {
        return None;
    }
    Some((start, end))
}

/// Whether `code` uses range notation.
pub fn is_range(code: &str) -> bool {
    split_range(code).is_some()
}

/// Expands a range notation into individual codes.
///
/// Expansion only happens when both endpoints share the same non-numeric
/// prefix and the trailing digits ascend. Otherwise the two endpoints are
/// returned as-is.
pub fn expand_range(code: &str) -> Vec<String> {
    let Some((start, end)) = split_range(code) else {
        return vec![code.trim().to_string()];
    };

    let endpoints = || vec![start.to_string(), end.to_string()];

    let (Some((start_prefix, start_digits)), Some((end_prefix, end_digits))) =
        (split_trailing_digits(start), split_trailing_digits(end))
    else {
        return endpoints();
    };

    if start_prefix != end_prefix {
        return endpoints();
    }

    match (start_digits.parse::<u64>(), end_digits.parse::<u64>()) {
        (Ok(from), Ok(to)) if from <= to && to - from >= MAX_RANGE_SPAN => {
            tracing::warn!(code, span = to - from, "ICD-10 range too wide to expand");
            endpoints()
        }
        (Ok(from), Ok(to)) if from <= to => {
            let width = start_digits.len();
            (from..=to)
                .map(|n| format!("{start_prefix}{n:0width$}"))
                .collect()
        }
        _ => endpoints(),
    }
}

/// Removes duplicate codes, keeping the first occurrence of each.
pub fn dedupe_codes<I>(codes: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    codes
        .into_iter()
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

/// `"S00.9"` -> `Some(("S00.", "9"))`, `"C7A"` -> `None`.
fn split_trailing_digits(code: &str) -> Option<(&str, &str)> {
    let prefix_len = code.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if prefix_len == code.len() {
        return None;
    }
    Some(code.split_at(prefix_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_code_passes_through() {
        assert_eq!(expand_range("J45.909"), vec!["J45.909"]);
        assert_eq!(expand_range(" E11 "), vec!["E11"]);
    }

    #[test]
    fn expands_same_prefix_range_with_padding() {
        assert_eq!(
            expand_range("A00-A03"),
            vec!["A00", "A01", "A02", "A03"]
        );
        assert_eq!(expand_range("A00-A09").len(), 10);
    }

    #[test]
    fn expands_decimal_suffix_range() {
        assert_eq!(
            expand_range("S00.0-S00.2"),
            vec!["S00.0", "S00.1", "S00.2"]
        );
    }

    #[test]
    fn widening_digit_run_keeps_start_width() {
        assert_eq!(expand_range("A8-A10"), vec!["A8", "A9", "A10"]);
    }

    #[test]
    fn differing_prefixes_return_endpoints() {
        assert_eq!(expand_range("A00-B99"), vec!["A00", "B99"]);
        assert_eq!(expand_range("V00-Y99"), vec!["V00", "Y99"]);
    }

    #[test]
    fn descending_or_non_numeric_ranges_return_endpoints() {
        assert_eq!(expand_range("A09-A00"), vec!["A09", "A00"]);
        assert_eq!(expand_range("C7A-C7B"), vec!["C7A", "C7B"]);
    }

    #[test]
    fn oversized_ranges_return_endpoints() {
        assert_eq!(expand_range("A0-A2000000"), vec!["A0", "A2000000"]);
        assert_eq!(
            expand_range("A0-A18446744073709551615"),
            vec!["A0", "A18446744073709551615"]
        );
        assert_eq!(expand_range("A000-A999").len(), 1000);
        assert_eq!(expand_range("A0000-A1000"), vec!["A0000", "A1000"]);
    }

    #[test]
    fn single_element_range() {
        assert_eq!(expand_range("E10-E10"), vec!["E10"]);
    }

    #[test]
    fn malformed_ranges_are_not_ranges() {
        assert!(!is_range("A00-"));
        assert!(!is_range("-A00"));
        assert!(!is_range("A00-A01-A02"));
        assert_eq!(expand_range("A00-"), vec!["A00-"]);
        assert!(is_range("A00 - A09"));
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let codes = vec!["B", "A", "B", "C", "A"]
            .into_iter()
            .map(String::from);
        assert_eq!(dedupe_codes(codes), vec!["B", "A", "C"]);
    }
}
