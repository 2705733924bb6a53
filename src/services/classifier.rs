//! Query complexity classification.
//!
//! Pure keyword/phrase matching: each tier owns a set of case-insensitive
//! patterns, checked in priority order from Expert down to Simple. The
//! first tier with any match wins; a query matching nothing falls back to
//! Medium. Classification never fails.

use regex::RegexSet;

use crate::domain::models::ComplexityTier;

/// Deterministic, side-effect-free complexity classifier.
pub struct ComplexityClassifier {
    expert: RegexSet,
    complex: RegexSet,
    medium: RegexSet,
    simple: RegexSet,
}

impl ComplexityClassifier {
    /// Compile the tier pattern sets.
    ///
    /// The pattern literals are fixed configuration; compilation cannot
    /// fail for them, so construction is infallible.
    pub fn new() -> Self {
        let compile = |patterns: &[&str]| {
            RegexSet::new(patterns.iter().map(|p| format!("(?i){p}")))
                .unwrap_or_else(|e| unreachable!("builtin tier patterns must compile: {e}"))
        };

        Self {
            expert: compile(&[
                r"consciousness|emergent|recursive|paradigm.*shift|bootstrap|self.*modifying",
                r"meta.*cognition|artificial.*general|superintelligence|singularity",
                r"recursive.*improvement|intelligence.*explosion|cognitive.*architecture",
            ]),
            complex: compile(&[
                r"design.*system|multi.*step.*process|causal.*reasoning|emergent.*properties",
                r"synthesize.*from.*multiple|cross.*domain.*analysis|systematic.*approach",
                r"optimize.*across.*dimensions|hierarchical.*structure|feedback.*loop",
            ]),
            medium: compile(&[
                r"compare.*and.*contrast|analyze.*relationship|evaluate.*trade.*offs",
                r"pros.*and.*cons|advantages.*disadvantages|correlation.*between",
                r"investigate.*connection|examine.*impact|assess.*implications",
            ]),
            simple: compile(&[
                r"what.*is|define|explain.*simply|basic.*concept|fundamental",
                r"how.*to.*do|step.*by.*step|guide.*for|tutorial",
                r"list.*of|enumerate|show.*me.*examples|tell.*me.*about",
            ]),
        }
    }

    /// Classify a query into a complexity tier.
    ///
    /// Tier pattern sets are consulted most-specific first (Expert,
    /// Complex, Medium, Simple); the first set with any match decides.
    pub fn classify(&self, query: &str) -> ComplexityTier {
        if self.expert.is_match(query) {
            ComplexityTier::Expert
        } else if self.complex.is_match(query) {
            ComplexityTier::Complex
        } else if self.medium.is_match(query) {
            ComplexityTier::Medium
        } else if self.simple.is_match(query) {
            ComplexityTier::Simple
        } else {
            ComplexityTier::default()
        }
    }
}

impl Default for ComplexityClassifier {
    fn default() -> Self {
        Self::new()
    }
}
