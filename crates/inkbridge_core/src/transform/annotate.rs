//! Semantic annotation passes over normalized text.
//!
//! # Responsibility
//! - Break paragraphs at naive sentence boundaries.
//! - Wrap candidate proper nouns in `[[...]]` note links.
//!
//! # Invariants
//! - The sentence heuristic is fixed: terminal punctuation, whitespace,
//!   ASCII capital. It misfires on abbreviations, decimals and quoted
//!   capitals; reproducible output matters more here than linguistic
//!   accuracy, so it must not be swapped for a smarter splitter.
//! - Link eligibility is decided on the clean word only; the token's
//!   residue is re-appended after the closing brackets.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static SENTENCE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])\s+([A-Z])").expect("valid sentence-break regex"));
static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"));

/// Capitalized words never treated as proper nouns.
const STANDARD_STOPLIST: &[&str] = &[
    "The", "A", "An", "This", "That", "These", "Those", "I", "You", "He", "She", "It", "We",
    "They",
];

/// Stoplist governing proper-noun link eligibility.
///
/// Membership is exact and case-sensitive: `The` is stopped, `THE` is not
/// (it falls to the all-uppercase rule instead).
#[derive(Debug, Clone)]
pub struct LinkRules {
    stoplist: BTreeSet<String>,
}

impl LinkRules {
    /// Standard rules: common capitalized pronouns and determiners.
    pub fn standard() -> Self {
        Self::with_stoplist(STANDARD_STOPLIST.iter().map(|word| word.to_string()))
    }

    /// Rules with a caller-provided stoplist.
    pub fn with_stoplist(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            stoplist: words.into_iter().collect(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stoplist.contains(word)
    }
}

impl Default for LinkRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// Replaces the whitespace between a sentence-terminal mark and a
/// following capital letter with a paragraph break.
pub fn resegment_sentences(text: &str) -> String {
    SENTENCE_BREAK_RE
        .replace_all(text, "${1}\n\n${2}")
        .into_owned()
}

/// Wraps eligible clean words in note-link brackets.
///
/// Tokens split on whitespace are rejoined with single spaces, so the
/// paragraph breaks inserted by [`resegment_sentences`] are flattened by
/// this pass; the result carries no leading or trailing whitespace.
pub fn link_proper_nouns(text: &str, rules: &LinkRules) -> String {
    let linked: Vec<String> = text
        .split_whitespace()
        .map(|token| link_token(token, rules))
        .collect();
    linked.join(" ")
}

fn link_token(token: &str, rules: &LinkRules) -> String {
    let clean = NON_WORD_RE.replace_all(token, "");
    if !is_linkable(&clean, rules) {
        return token.to_string();
    }
    // Residue is whatever trails the clean word, typically punctuation.
    let residue: String = token.chars().skip(clean.chars().count()).collect();
    format!("[[{clean}]]{residue}")
}

fn is_linkable(clean: &str, rules: &LinkRules) -> bool {
    let first = match clean.chars().next() {
        Some(c) => c,
        None => return false,
    };
    first.is_uppercase()
        && clean.chars().count() > 1
        && !rules.is_stopword(clean)
        && !is_entirely_uppercase(clean)
}

/// True when the word has at least one cased character and no lowercase
/// cased character (acronym shape, e.g. `NASA`).
fn is_entirely_uppercase(word: &str) -> bool {
    let mut has_cased = false;
    for c in word.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

#[cfg(test)]
mod tests {
    use super::{is_entirely_uppercase, link_proper_nouns, resegment_sentences, LinkRules};

    #[test]
    fn resegments_after_each_terminal_mark() {
        assert_eq!(
            resegment_sentences("One done! Two done? Three."),
            "One done!\n\nTwo done?\n\nThree."
        );
    }

    #[test]
    fn resegmentation_needs_a_capital_follower() {
        assert_eq!(
            resegment_sentences("approx. three items"),
            "approx. three items"
        );
    }

    #[test]
    fn residue_stays_outside_the_brackets() {
        let rules = LinkRules::standard();
        assert_eq!(link_proper_nouns("Paris,", &rules), "[[Paris]],");
        assert_eq!(link_proper_nouns("Paris!?", &rules), "[[Paris]]!?");
    }

    #[test]
    fn uppercase_detection_matches_acronym_shape() {
        assert!(is_entirely_uppercase("NASA"));
        assert!(is_entirely_uppercase("A1"));
        assert!(!is_entirely_uppercase("Nasa"));
        assert!(!is_entirely_uppercase("1234"));
    }
}
