//! Text Normalizer: turns raw extracted document text into a single-line,
//! analysis-ready string.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything outside word characters, whitespace and `. , ! ? ; : ( ) - @`.
static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?;:()\-@]").expect("valid disallowed-chars regex"));

static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strips disallowed characters, folds every whitespace run (line breaks included)
/// into one space, and trims. Idempotent.
///
/// Stripping runs before folding so removed characters cannot leave double spaces behind.
pub fn normalize(raw: &str) -> String {
    let stripped = DISALLOWED_CHARS.replace_all(raw, "");
    WHITESPACE_RUNS
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_line_breaks() {
        assert_eq!(
            normalize("Senior   Engineer\r\n\r\nRust,\tGo\n"),
            "Senior Engineer Rust, Go"
        );
    }

    #[test]
    fn test_strips_characters_outside_allow_list() {
        assert_eq!(
            normalize("• Built APIs & services (99.9% uptime) — jane@example.com"),
            "Built APIs services (99.9 uptime) jane@example.com"
        );
    }

    #[test]
    fn test_keeps_allowed_punctuation() {
        let text = "Hello, world! Really? Yes; note: (a-b) @me.";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
        assert_eq!(normalize("***"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "a * b",
            "  Résumé —\n\nC++ / Rust  ",
            "Led 5-person team | shipped v2.0 ~ 3 months early",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
