//! Tool roles, execution patterns, and the per-tier pattern catalog.
//!
//! A pattern is the ordered sequence of tool roles a run executes for a
//! given complexity tier. The catalog is configuration data: a fixed table,
//! not a computed schedule.

use serde::{Deserialize, Serialize};

use super::complexity::ComplexityTier;

/// Coarse/fine alternation label on a tool role.
///
/// Carried as metadata for reporting; it does not influence control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    High,
    Low,
}

impl HierarchyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// One step in an execution pattern: which tool to invoke and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRole {
    /// Tool identifier resolved against the invoker's registry.
    pub tool_id: String,
    /// Coarse (High) or fine (Low) reasoning step.
    pub level: HierarchyLevel,
    /// Human-readable intent, threaded into the tool parameters.
    pub intent: String,
}

impl ToolRole {
    pub fn new(tool_id: impl Into<String>, level: HierarchyLevel, intent: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            level,
            intent: intent.into(),
        }
    }
}

/// Stable index key for historical pattern performance.
///
/// Two runs with the same tier and the same ordered tool ids map to the
/// same key, across processes and regardless of intents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternKey(String);

impl PatternKey {
    pub fn new(tier: ComplexityTier, pattern: &[ToolRole]) -> Self {
        let tools: Vec<&str> = pattern.iter().map(|r| r.tool_id.as_str()).collect();
        Self(format!("{}:{}", tier.as_str(), tools.join("-")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PatternKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tool identifiers
// ---------------------------------------------------------------------------

/// Canonical tool identifiers used by the built-in catalog.
pub mod tools {
    pub const MEMORY_RECALL: &str = "memory_recall";
    pub const WEB_SEARCH: &str = "web_search";
    pub const SEQUENTIAL_THINKING: &str = "sequential_thinking";
    pub const SYSTEMATIC_VERIFY: &str = "systematic_verify";
    pub const MEMORY_STORE: &str = "memory_store";
}

// ---------------------------------------------------------------------------
// Pattern catalog
// ---------------------------------------------------------------------------

/// Look up the execution pattern for a complexity tier.
///
/// Pure table lookup. Pattern lengths are fixed: Simple 1, Medium 3,
/// Complex 5, Expert 6, with High/Low levels following a fixed schedule.
pub fn pattern_for(tier: ComplexityTier) -> Vec<ToolRole> {
    use HierarchyLevel::{High, Low};
    use tools::*;

    match tier {
        ComplexityTier::Simple => vec![ToolRole::new(
            MEMORY_RECALL,
            High,
            "Retrieve existing knowledge",
        )],
        ComplexityTier::Medium => vec![
            ToolRole::new(MEMORY_RECALL, High, "Load context"),
            ToolRole::new(WEB_SEARCH, Low, "Gather information"),
            ToolRole::new(MEMORY_STORE, High, "Store synthesis"),
        ],
        ComplexityTier::Complex => vec![
            ToolRole::new(MEMORY_RECALL, High, "Deep context loading"),
            ToolRole::new(SEQUENTIAL_THINKING, Low, "Problem decomposition"),
            ToolRole::new(WEB_SEARCH, High, "Research validation"),
            ToolRole::new(SYSTEMATIC_VERIFY, Low, "Multi-perspective analysis"),
            ToolRole::new(MEMORY_STORE, High, "Comprehensive storage"),
        ],
        ComplexityTier::Expert => vec![
            ToolRole::new(MEMORY_RECALL, High, "Context and prior breakthroughs"),
            ToolRole::new(SEQUENTIAL_THINKING, Low, "Initial analysis"),
            ToolRole::new(WEB_SEARCH, High, "Current state research"),
            ToolRole::new(SYSTEMATIC_VERIFY, Low, "Deep reasoning"),
            ToolRole::new(SEQUENTIAL_THINKING, Low, "Synthesis validation"),
            ToolRole::new(MEMORY_STORE, High, "Breakthrough storage"),
        ],
    }
}
