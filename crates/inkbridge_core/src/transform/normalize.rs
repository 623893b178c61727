//! Raw export text normalization.
//!
//! # Responsibility
//! - Unify line-ending conventions to `\n`.
//! - Collapse runs of blank lines down to a single blank line.
//!
//! # Invariants
//! - Total over strings: never fails, performs no I/O.
//! - Idempotent: applying twice equals applying once.
//! - Output never contains `\r`.

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("valid blank-run regex"));

/// Normalizes line endings and blank-line runs in raw export text.
///
/// `\r\n` and bare `\r` become `\n`; any run of three or more
/// newline-separated blank lines becomes exactly one blank line.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    BLANK_RUN_RE.replace_all(&unified, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::normalize_text;

    #[test]
    fn unifies_carriage_returns() {
        assert_eq!(normalize_text("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn collapses_blank_runs_containing_spaces() {
        assert_eq!(normalize_text("a\n \n\t\nb"), "a\n\nb");
    }

    #[test]
    fn leaves_single_blank_line_untouched() {
        assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
    }
}
