//! Best-effort extraction of a fractional pass count from free-text output.
//!
//! Test runners that print a summary line like `42 of 50 tests passed` get
//! partial credit without any structured protocol. The match is intentionally
//! tolerant: case-insensitive, first occurrence anywhere in the text, and
//! only the literal word "passed" is required after the counts.

use regex::Regex;

/// Pattern for a `<passed> of <total> ... passed` summary line.
const SUMMARY_PATTERN: &str = r"(?i)(\d+)\s+of\s+(\d+)\s+.*passed";

/// Returns `(passed, total)` from the first summary match in `message`,
/// or `None` when no usable summary is present.
pub fn extract_pass_counts(message: &str) -> Option<(u64, u64)> {
    let re = Regex::new(SUMMARY_PATTERN).ok()?;
    let caps = re.captures(message)?;
    let passed = caps.get(1)?.as_str().parse().ok()?;
    let total = caps.get(2)?.as_str().parse().ok()?;
    Some((passed, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_basic_summary() {
        assert_eq!(
            extract_pass_counts("42 of 50 tests passed"),
            Some((42, 50))
        );
    }

    #[test]
    fn test_is_case_insensitive() {
        assert_eq!(extract_pass_counts("8 OF 10 Tests PASSED"), Some((8, 10)));
    }

    #[test]
    fn test_matches_anywhere_in_text() {
        let text = "compiling...\nrunning suite\n3 of 7 assertions passed\ndone\n";
        assert_eq!(extract_pass_counts(text), Some((3, 7)));
    }

    #[test]
    fn test_allows_arbitrary_words_before_passed() {
        assert_eq!(
            extract_pass_counts("5 of 9 integration checks eventually passed"),
            Some((5, 9))
        );
    }

    #[test]
    fn test_first_match_wins() {
        let text = "1 of 2 units passed\n3 of 4 e2e passed\n";
        assert_eq!(extract_pass_counts(text), Some((1, 2)));
    }

    #[test]
    fn test_zero_counts_are_extracted() {
        assert_eq!(extract_pass_counts("0 of 0 tests passed"), Some((0, 0)));
    }

    #[test]
    fn test_no_match_without_passed() {
        assert_eq!(extract_pass_counts("3 of 7 tests failed"), None);
        assert_eq!(extract_pass_counts("all good"), None);
        assert_eq!(extract_pass_counts(""), None);
    }

    #[test]
    fn test_requires_of_between_counts() {
        assert_eq!(extract_pass_counts("3 / 7 tests passed"), None);
    }

    #[test]
    fn test_oversized_counts_are_rejected() {
        // Larger than u64: parse fails, treated as no summary.
        assert_eq!(
            extract_pass_counts("99999999999999999999999 of 2 tests passed"),
            None
        );
    }
}
