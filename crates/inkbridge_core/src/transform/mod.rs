//! Content transformation pipeline for handwriting exports.
//!
//! # Responsibility
//! - Compose the normalization and annotation passes into one pure
//!   function from raw export text to note-ready text.
//!
//! # Invariants
//! - The pipeline holds no external resources and performs no I/O; each
//!   invocation depends only on its input and the configured rules.

mod annotate;
mod normalize;

pub use annotate::{link_proper_nouns, resegment_sentences, LinkRules};
pub use normalize::normalize_text;

/// Fixed pass sequence: normalize, resegment, link.
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    rules: LinkRules,
}

impl TransformPipeline {
    /// Pipeline with the standard link rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with caller-provided link rules.
    pub fn with_rules(rules: LinkRules) -> Self {
        Self { rules }
    }

    /// Runs the full pipeline over raw export text. Total; never fails.
    pub fn apply(&self, raw: &str) -> String {
        let normalized = normalize_text(raw);
        let resegmented = resegment_sentences(&normalized);
        link_proper_nouns(&resegmented, &self.rules)
    }
}
