//! Convergence strategies and the combined verdict.
//!
//! Four independent heuristics each produce a `StrategyResult`; the engine
//! combines them by weighted vote into a single `ConvergenceVerdict`. The
//! weight table lives here, keyed by strategy variant, so the combination
//! logic stays an explicit table lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four convergence-detection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    ConfidenceThreshold,
    DiminishingReturns,
    ConsensusValidation,
    AdaptiveLearning,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfidenceThreshold => "confidence_threshold",
            Self::DiminishingReturns => "diminishing_returns",
            Self::ConsensusValidation => "consensus_validation",
            Self::AdaptiveLearning => "adaptive_learning",
        }
    }

    /// Vote weight of this strategy in the combined decision.
    ///
    /// Weights sum to 1.0 across all four variants.
    pub fn weight(&self) -> f64 {
        match self {
            Self::ConfidenceThreshold => 0.40,
            Self::DiminishingReturns => 0.20,
            Self::ConsensusValidation => 0.25,
            Self::AdaptiveLearning => 0.15,
        }
    }

    pub fn all() -> [Self; 4] {
        [
            Self::ConfidenceThreshold,
            Self::DiminishingReturns,
            Self::ConsensusValidation,
            Self::AdaptiveLearning,
        ]
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single strategy evaluation.
///
/// A strategy that lacks the data to judge (e.g. fewer than three samples
/// for diminishing returns) abstains: `converged = false`, `score = 0.0`.
/// Abstaining strategies contribute neither vote weight nor score to the
/// combined verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResult {
    pub strategy: StrategyKind,
    pub converged: bool,
    /// Strategy-local score in [0, 1].
    pub score: f64,
    pub rationale: String,
    /// Strategy-specific sub-metrics, for reporting only.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metrics: Value,
}

impl StrategyResult {
    /// An abstention: the strategy had too little data to vote.
    pub fn abstain(strategy: StrategyKind, rationale: impl Into<String>) -> Self {
        Self {
            strategy,
            converged: false,
            score: 0.0,
            rationale: rationale.into(),
            metrics: Value::Null,
        }
    }

    /// True when this result participates in the weighted vote.
    pub fn is_active(&self) -> bool {
        self.score > 0.0
    }
}

/// Final convergence decision for a run. Created once, read-only downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceVerdict {
    pub converged: bool,
    /// Weighted sum of active strategy scores, in [0, 1].
    pub combined_score: f64,
    /// Accumulated weight of active strategies that voted converged.
    pub vote_weight: f64,
    /// Strategy with the single highest individual score.
    pub primary_strategy: StrategyKind,
    pub strategy_results: Vec<StrategyResult>,
    pub reason: String,
    pub recommendation: String,
    pub evaluated_at: DateTime<Utc>,
}

impl ConvergenceVerdict {
    /// Fixed verdict for runs with no usable data: zero records, or no
    /// successful record carrying a confidence.
    pub fn no_data(reason: impl Into<String>) -> Self {
        Self {
            converged: false,
            combined_score: 0.0,
            vote_weight: 0.0,
            primary_strategy: StrategyKind::ConfidenceThreshold,
            strategy_results: Vec::new(),
            reason: reason.into(),
            recommendation:
                "System needs attention - review input data and tool configuration".to_string(),
            evaluated_at: Utc::now(),
        }
    }
}

/// Advisory recommendation derived from (converged, combined score).
///
/// Fixed score bands; output only, never consulted by control logic.
pub fn recommendation(converged: bool, score: f64) -> String {
    if converged {
        if score >= 0.9 {
            "Excellent convergence achieved - consider reducing future pattern complexity for efficiency".to_string()
        } else if score >= 0.8 {
            "Good convergence achieved - pattern is well-optimized".to_string()
        } else {
            "Convergence achieved but with room for improvement - consider pattern refinement"
                .to_string()
        }
    } else if score >= 0.6 {
        "Near convergence - one additional iteration may achieve convergence".to_string()
    } else if score >= 0.4 {
        "Moderate progress - continue with current pattern or consider tool adjustment".to_string()
    } else {
        "Low convergence - consider alternative reasoning pattern or tool selection".to_string()
    }
}
