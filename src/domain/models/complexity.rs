//! Query complexity tiers.
//!
//! Tiers are ordinal: higher tiers select longer tool patterns and demand
//! stricter convergence thresholds.

use serde::{Deserialize, Serialize};

/// Ordinal complexity classification of an incoming query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Simple,
    /// Fail-safe default for queries no tier pattern matches.
    #[default]
    Medium,
    Complex,
    Expert,
}

impl ComplexityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
            Self::Expert => "expert",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "medium" => Some(Self::Medium),
            "complex" => Some(Self::Complex),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }

    /// Confidence threshold the confidence-threshold strategy applies at
    /// this tier. Stricter for harder queries.
    pub fn confidence_threshold(&self) -> f64 {
        match self {
            Self::Simple => 0.65,
            Self::Medium => 0.75,
            Self::Complex => 0.80,
            Self::Expert => 0.85,
        }
    }

    /// All tiers in ascending order of difficulty.
    pub fn all() -> [Self; 4] {
        [Self::Simple, Self::Medium, Self::Complex, Self::Expert]
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
