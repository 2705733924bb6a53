//! In-memory historical pattern performance.
//!
//! Process-lifetime state shared by concurrent runs: per pattern key, a
//! capped rolling history of run-level confidence averages, plus a capped
//! global history of convergence outcomes. Appends and average recompute
//! happen under one write lock, so concurrent runs sharing a key cannot
//! lose updates.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{ComplexityTier, PatternKey};

/// Most recent confidence averages retained per pattern.
const PATTERN_HISTORY_CAP: usize = 50;

/// Most recent convergence outcomes retained globally.
const CONVERGENCE_HISTORY_CAP: usize = 100;

/// Rolling performance data for one pattern key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternPerformance {
    /// Total runs recorded for this key.
    pub executions: u64,
    /// Run-level mean confidences, oldest first, capped at 50 entries.
    pub confidence_history: VecDeque<f64>,
    /// Running average over `confidence_history`.
    pub average_confidence: f64,
}

impl PatternPerformance {
    fn new() -> Self {
        Self {
            executions: 0,
            confidence_history: VecDeque::with_capacity(PATTERN_HISTORY_CAP),
            average_confidence: 0.0,
        }
    }

    fn record(&mut self, mean_confidence: f64) {
        self.executions += 1;
        if self.confidence_history.len() == PATTERN_HISTORY_CAP {
            self.confidence_history.pop_front();
        }
        self.confidence_history.push_back(mean_confidence);
        let total: f64 = self.confidence_history.iter().sum();
        self.average_confidence = total / self.confidence_history.len() as f64;
    }
}

/// One entry in the global convergence history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceOutcome {
    pub pattern_key: PatternKey,
    pub tier: ComplexityTier,
    pub converged: bool,
    pub combined_score: f64,
    pub recorded_at: DateTime<Utc>,
}

/// A high-performing pattern surfaced by `learning_insights`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPattern {
    pub pattern_key: PatternKey,
    pub average_confidence: f64,
    pub executions: u64,
}

/// Aggregate view over everything the store has learned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningInsights {
    pub total_patterns: usize,
    pub total_executions: u64,
    /// Up to three patterns with the highest historical average.
    pub top_patterns: Vec<TopPattern>,
    pub converged_runs: usize,
    pub total_runs: usize,
}

/// Shared, injectable store of pattern performance. The only cross-run
/// mutable resource in the system.
#[derive(Debug, Default)]
pub struct PatternPerformanceStore {
    patterns: RwLock<HashMap<PatternKey, PatternPerformance>>,
    convergence_history: RwLock<VecDeque<ConvergenceOutcome>>,
}

impl PatternPerformanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the performance data for a key, if any run has been
    /// recorded against it.
    pub fn get(&self, key: &PatternKey) -> Option<PatternPerformance> {
        self.patterns
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Append a run's mean confidence to the key's capped history and
    /// recompute the running average. Creates the entry lazily.
    pub fn record(&self, key: &PatternKey, mean_confidence: f64) {
        let mut patterns = self
            .patterns
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        patterns
            .entry(key.clone())
            .or_insert_with(PatternPerformance::new)
            .record(mean_confidence);
    }

    /// Append a verdict summary to the capped global history.
    pub fn append_convergence(&self, outcome: ConvergenceOutcome) {
        let mut history = self
            .convergence_history
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if history.len() == CONVERGENCE_HISTORY_CAP {
            history.pop_front();
        }
        history.push_back(outcome);
    }

    /// Summarize learned pattern performance for reporting.
    pub fn learning_insights(&self) -> LearningInsights {
        let patterns = self
            .patterns
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let history = self
            .convergence_history
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut top: Vec<TopPattern> = patterns
            .iter()
            .map(|(key, perf)| TopPattern {
                pattern_key: key.clone(),
                average_confidence: perf.average_confidence,
                executions: perf.executions,
            })
            .collect();
        top.sort_by(|a, b| {
            b.average_confidence
                .partial_cmp(&a.average_confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        top.truncate(3);

        LearningInsights {
            total_patterns: patterns.len(),
            total_executions: patterns.values().map(|p| p.executions).sum(),
            top_patterns: top,
            converged_runs: history.iter().filter(|o| o.converged).count(),
            total_runs: history.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::pattern::pattern_for;

    fn key(tier: ComplexityTier) -> PatternKey {
        PatternKey::new(tier, &pattern_for(tier))
    }

    #[test]
    fn history_is_capped_at_fifty_entries() {
        let store = PatternPerformanceStore::new();
        let key = key(ComplexityTier::Medium);

        for i in 0..1000 {
            store.record(&key, f64::from(i % 10) / 10.0);
        }

        let perf = store.get(&key).unwrap();
        assert_eq!(perf.confidence_history.len(), 50);
        assert_eq!(perf.executions, 1000);
    }

    #[test]
    fn running_average_tracks_retained_history() {
        let store = PatternPerformanceStore::new();
        let key = key(ComplexityTier::Simple);

        store.record(&key, 0.6);
        store.record(&key, 0.8);

        let perf = store.get(&key).unwrap();
        assert!((perf.average_confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn unknown_key_has_no_entry() {
        let store = PatternPerformanceStore::new();
        assert!(store.get(&key(ComplexityTier::Expert)).is_none());
    }

    #[test]
    fn convergence_history_is_capped_at_one_hundred() {
        let store = PatternPerformanceStore::new();
        for i in 0..250 {
            store.append_convergence(ConvergenceOutcome {
                pattern_key: key(ComplexityTier::Medium),
                tier: ComplexityTier::Medium,
                converged: i % 2 == 0,
                combined_score: 0.5,
                recorded_at: Utc::now(),
            });
        }
        let insights = store.learning_insights();
        assert_eq!(insights.total_runs, 100);
    }

    #[test]
    fn learning_insights_surface_best_patterns_first() {
        let store = PatternPerformanceStore::new();
        store.record(&key(ComplexityTier::Simple), 0.9);
        store.record(&key(ComplexityTier::Medium), 0.7);
        store.record(&key(ComplexityTier::Complex), 0.8);
        store.record(&key(ComplexityTier::Expert), 0.6);

        let insights = store.learning_insights();
        assert_eq!(insights.total_patterns, 4);
        assert_eq!(insights.total_executions, 4);
        assert_eq!(insights.top_patterns.len(), 3);
        assert!((insights.top_patterns[0].average_confidence - 0.9).abs() < 1e-9);
        assert!(insights
            .top_patterns
            .windows(2)
            .all(|w| w[0].average_confidence >= w[1].average_confidence));
    }
}
