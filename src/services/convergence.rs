//! Multi-strategy convergence analysis.
//!
//! Four independent heuristics judge whether a run's accumulated tool
//! results are sufficient to stop:
//!
//! - **Confidence-threshold** -- mean confidence against a tier-specific
//!   threshold, gated by success rate and stability.
//! - **Diminishing-returns** -- successive confidence gains flattening out.
//! - **Consensus-validation** -- agreement across per-tool confidence means.
//! - **Adaptive-learning** -- current performance against the pattern's own
//!   history, with a cold-start fallback to the base threshold.
//!
//! Each active strategy (score > 0) contributes its fixed weight to a
//! convergence vote when it judged converged, and weight x score to the
//! combined score. The verdict converges when the accumulated vote weight
//! reaches 0.5. Abstaining strategies contribute nothing; the 0.5 bar is
//! not renormalized over the active weights.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::models::{
    recommendation, ComplexityTier, ConvergenceConfig, ConvergenceVerdict, ExecutionRecord,
    PatternKey, StrategyKind, StrategyResult,
};
use crate::services::performance::{ConvergenceOutcome, PatternPerformanceStore};

/// Gains at or below this are considered flat for diminishing returns.
const FLAT_GAIN: f64 = 0.05;

/// Average gain below which a flat tail means convergence.
const DIMINISHING_AVG_GAIN: f64 = 0.1;

/// Convergence decision engine over an injected performance store.
pub struct ConvergenceEngine {
    store: Arc<PatternPerformanceStore>,
    base_threshold: f64,
}

impl ConvergenceEngine {
    pub fn new(store: Arc<PatternPerformanceStore>, config: &ConvergenceConfig) -> Self {
        Self {
            store,
            base_threshold: config.base_threshold,
        }
    }

    /// Evaluate a run's records into a convergence verdict, then record
    /// the run's mean confidence and outcome in the performance store.
    ///
    /// Runs with no records, or no successful record carrying a
    /// confidence, yield a fixed non-converged verdict and leave the
    /// store untouched (there is no meaningful mean to record).
    pub fn evaluate(
        &self,
        records: &[ExecutionRecord],
        tier: ComplexityTier,
        pattern_key: &PatternKey,
    ) -> ConvergenceVerdict {
        if records.is_empty() {
            return ConvergenceVerdict::no_data("No results to analyze");
        }

        let confidences: Vec<f64> = records
            .iter()
            .filter(|r| r.success)
            .map(|r| r.confidence)
            .collect();
        if confidences.is_empty() {
            return ConvergenceVerdict::no_data("No successful results with confidence");
        }

        let success_rate = confidences.len() as f64 / records.len() as f64;
        let mean_confidence = mean(&confidences);

        let results = vec![
            self.confidence_threshold(&confidences, success_rate, tier),
            self.diminishing_returns(&confidences),
            self.consensus_validation(records),
            self.adaptive_learning(mean_confidence, pattern_key),
        ];

        let verdict = self.combine(results);

        self.store.record(pattern_key, mean_confidence);
        self.store.append_convergence(ConvergenceOutcome {
            pattern_key: pattern_key.clone(),
            tier,
            converged: verdict.converged,
            combined_score: verdict.combined_score,
            recorded_at: Utc::now(),
        });

        debug!(
            pattern_key = %pattern_key,
            converged = verdict.converged,
            combined_score = verdict.combined_score,
            primary = %verdict.primary_strategy,
            "Convergence evaluated"
        );

        verdict
    }

    // -----------------------------------------------------------------------
    // Strategy 1: confidence threshold
    // -----------------------------------------------------------------------

    /// Mean confidence against the tier threshold, gated by success rate
    /// (>= 0.8) and stability (>= 0.7), where stability is one minus the
    /// coefficient of variation, floored at zero.
    fn confidence_threshold(
        &self,
        confidences: &[f64],
        success_rate: f64,
        tier: ComplexityTier,
    ) -> StrategyResult {
        let threshold = tier.confidence_threshold();
        let avg = mean(confidences);
        let std = stdev(confidences);
        let stability = if avg > 0.0 {
            1.0 - (std / avg).min(1.0)
        } else {
            0.0
        };

        let converged = avg >= threshold && success_rate >= 0.8 && stability >= 0.7;

        StrategyResult {
            strategy: StrategyKind::ConfidenceThreshold,
            converged,
            score: (avg * success_rate * stability).clamp(0.0, 1.0),
            rationale: format!(
                "Confidence: {avg:.2} vs {threshold:.2}, Success: {:.0}%, Stability: {stability:.2}",
                success_rate * 100.0
            ),
            metrics: json!({
                "avg_confidence": avg,
                "threshold": threshold,
                "success_rate": success_rate,
                "stability": stability,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Strategy 2: diminishing returns
    // -----------------------------------------------------------------------

    /// Detects when further steps stopped adding confidence: the two most
    /// recent gains are flat and the average gain over the series is
    /// small. Needs at least three successful samples; abstains otherwise.
    fn diminishing_returns(&self, confidences: &[f64]) -> StrategyResult {
        if confidences.len() < 3 {
            return StrategyResult::abstain(
                StrategyKind::DiminishingReturns,
                "Insufficient data for diminishing returns analysis",
            );
        }

        // Only positive gains count; regressions clamp to zero.
        let gains: Vec<f64> = confidences
            .windows(2)
            .map(|w| (w[1] - w[0]).max(0.0))
            .collect();
        let recent = &gains[gains.len() - 2..];
        let flat_tail = recent.iter().all(|g| *g <= FLAT_GAIN);
        let avg_gain = mean(&gains);

        let converged = flat_tail && avg_gain < DIMINISHING_AVG_GAIN;
        let score = if converged { 1.0 - avg_gain } else { avg_gain };

        StrategyResult {
            strategy: StrategyKind::DiminishingReturns,
            converged,
            score: score.clamp(0.0, 1.0),
            rationale: format!("Information gain trend: {recent:.3?}, avg: {avg_gain:.3}"),
            metrics: json!({
                "information_gains": gains,
                "average_gain": avg_gain,
                "recent_trend": recent,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Strategy 3: consensus validation
    // -----------------------------------------------------------------------

    /// Cross-validates by grouping records per tool: converged when the
    /// per-tool confidence means agree at a high level. Needs at least two
    /// records and one successful confidence; abstains otherwise.
    fn consensus_validation(&self, records: &[ExecutionRecord]) -> StrategyResult {
        if records.len() < 2 {
            return StrategyResult::abstain(
                StrategyKind::ConsensusValidation,
                "Insufficient results for consensus validation",
            );
        }

        let mut by_tool: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in records.iter().filter(|r| r.success) {
            by_tool
                .entry(record.tool_id.as_str())
                .or_default()
                .push(record.confidence);
        }

        let tool_means: Vec<f64> = by_tool.values().map(|c| mean(c)).collect();
        if tool_means.is_empty() {
            return StrategyResult::abstain(
                StrategyKind::ConsensusValidation,
                "No valid consensus data",
            );
        }

        let overall = mean(&tool_means);
        let stability = if tool_means.len() > 1 && overall > 0.0 {
            (1.0 - stdev(&tool_means) / overall).max(0.0)
        } else {
            1.0
        };

        let converged = overall >= 0.75 && stability >= 0.8;
        let tool_consensus: BTreeMap<&str, f64> = by_tool
            .keys()
            .copied()
            .zip(tool_means.iter().copied())
            .collect();

        StrategyResult {
            strategy: StrategyKind::ConsensusValidation,
            converged,
            score: (overall * stability).clamp(0.0, 1.0),
            rationale: format!("Consensus: {overall:.2}, Stability: {stability:.2}"),
            metrics: json!({
                "tool_consensus": tool_consensus,
                "overall_consensus": overall,
                "stability": stability,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Strategy 4: adaptive learning
    // -----------------------------------------------------------------------

    /// Judges current mean confidence against the pattern's own history.
    /// The first run of a pattern key uses the engine's base threshold;
    /// later runs face an adaptive threshold of the historical average
    /// plus 0.1, capped at 0.9.
    fn adaptive_learning(&self, mean_confidence: f64, pattern_key: &PatternKey) -> StrategyResult {
        let historical = self
            .store
            .get(pattern_key)
            .filter(|perf| perf.executions > 0);

        match historical {
            Some(perf) => {
                let adaptive_threshold = (perf.average_confidence + 0.1).min(0.9);
                let delta = mean_confidence - perf.average_confidence;
                StrategyResult {
                    strategy: StrategyKind::AdaptiveLearning,
                    converged: mean_confidence >= adaptive_threshold,
                    score: (mean_confidence / adaptive_threshold).clamp(0.0, 1.0),
                    rationale: format!(
                        "Adaptive threshold: {adaptive_threshold:.2}, Performance delta: {delta:+.3}"
                    ),
                    metrics: json!({
                        "current_confidence": mean_confidence,
                        "historical_avg": perf.average_confidence,
                        "performance_delta": delta,
                        "adaptive_threshold": adaptive_threshold,
                        "executions": perf.executions,
                    }),
                }
            }
            None => StrategyResult {
                strategy: StrategyKind::AdaptiveLearning,
                converged: mean_confidence >= self.base_threshold,
                score: mean_confidence.clamp(0.0, 1.0),
                rationale: "First execution for this pattern - using base threshold".to_string(),
                metrics: json!({
                    "current_confidence": mean_confidence,
                    "base_threshold": self.base_threshold,
                }),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Weighted combination
    // -----------------------------------------------------------------------

    /// Fold the strategy results into the final verdict by weighted vote.
    fn combine(&self, results: Vec<StrategyResult>) -> ConvergenceVerdict {
        let active: Vec<&StrategyResult> = results.iter().filter(|r| r.is_active()).collect();
        if active.is_empty() {
            let mut verdict = ConvergenceVerdict::no_data("No valid convergence strategies");
            verdict.strategy_results = results;
            return verdict;
        }

        let mut combined_score = 0.0;
        let mut vote_weight = 0.0;
        for result in &active {
            let weight = result.strategy.weight();
            combined_score += weight * result.score;
            if result.converged {
                vote_weight += weight;
            }
        }

        let primary_strategy = active
            .iter()
            .max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|r| r.strategy)
            .unwrap_or(StrategyKind::ConfidenceThreshold);

        let converged = vote_weight >= 0.5;
        let combined_score = combined_score.clamp(0.0, 1.0);

        ConvergenceVerdict {
            converged,
            combined_score,
            vote_weight,
            primary_strategy,
            reason: format!(
                "Combined analysis: {vote_weight:.1}/1.0 vote weight, primary: {primary_strategy}"
            ),
            recommendation: recommendation(converged, combined_score),
            strategy_results: results,
            evaluated_at: Utc::now(),
        }
    }
}

/// Arithmetic mean. Callers guarantee non-empty input.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; zero for fewer than two values.
fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;

    use crate::domain::models::pattern::pattern_for;
    use crate::domain::models::ConvergenceConfig;

    fn engine_with_store() -> (ConvergenceEngine, Arc<PatternPerformanceStore>) {
        let store = Arc::new(PatternPerformanceStore::new());
        let engine = ConvergenceEngine::new(Arc::clone(&store), &ConvergenceConfig::default());
        (engine, store)
    }

    fn success_record(tool_id: &str, confidence: f64) -> ExecutionRecord {
        ExecutionRecord::success(tool_id, confidence, Duration::from_millis(10), 0, json!({}))
    }

    fn failure_record(tool_id: &str) -> ExecutionRecord {
        ExecutionRecord::failure(tool_id, Duration::from_millis(10), 2, "boom")
    }

    fn medium_key() -> PatternKey {
        PatternKey::new(
            ComplexityTier::Medium,
            &pattern_for(ComplexityTier::Medium),
        )
    }

    fn strategy<'a>(
        verdict: &'a ConvergenceVerdict,
        kind: StrategyKind,
    ) -> &'a StrategyResult {
        verdict
            .strategy_results
            .iter()
            .find(|r| r.strategy == kind)
            .expect("strategy result present")
    }

    #[test]
    fn high_confidence_medium_run_converges_on_threshold_strategy() {
        let (engine, _store) = engine_with_store();
        let records = vec![
            success_record("memory_recall", 0.92),
            success_record("web_search", 0.88),
            success_record("memory_store", 0.90),
        ];

        let verdict = engine.evaluate(&records, ComplexityTier::Medium, &medium_key());

        let threshold = strategy(&verdict, StrategyKind::ConfidenceThreshold);
        assert!(threshold.converged, "mean 0.90 >= 0.75 with full success and near-unit stability");
        assert!(threshold.score > 0.85);
        assert!(verdict.converged);
    }

    #[test]
    fn flattening_gains_trigger_diminishing_returns() {
        let (engine, _store) = engine_with_store();
        let confidences = [0.70, 0.75, 0.77, 0.78, 0.78];
        let records: Vec<ExecutionRecord> = confidences
            .iter()
            .enumerate()
            .map(|(i, c)| success_record(&format!("tool_{i}"), *c))
            .collect();

        let verdict = engine.evaluate(&records, ComplexityTier::Complex, &medium_key());

        let diminishing = strategy(&verdict, StrategyKind::DiminishingReturns);
        assert!(diminishing.converged);
        // avg gain = (0.05 + 0.02 + 0.01 + 0.0) / 4 = 0.02; score = 0.98
        assert!((diminishing.score - 0.98).abs() < 1e-9);
    }

    #[test]
    fn diminishing_returns_abstains_below_three_samples() {
        let (engine, _store) = engine_with_store();
        let records = vec![
            success_record("memory_recall", 0.8),
            success_record("web_search", 0.85),
        ];

        let verdict = engine.evaluate(&records, ComplexityTier::Medium, &medium_key());

        let diminishing = strategy(&verdict, StrategyKind::DiminishingReturns);
        assert!(!diminishing.converged);
        assert!(!diminishing.is_active());
    }

    #[test]
    fn consensus_abstains_on_single_record() {
        let (engine, _store) = engine_with_store();
        let records = vec![success_record("memory_recall", 0.9)];

        let verdict = engine.evaluate(&records, ComplexityTier::Simple, &medium_key());

        let consensus = strategy(&verdict, StrategyKind::ConsensusValidation);
        assert!(!consensus.is_active());
    }

    #[test]
    fn adaptive_learning_cold_start_uses_base_threshold() {
        let (engine, store) = engine_with_store();
        let key = medium_key();
        assert!(store.get(&key).is_none());

        let records = vec![
            success_record("memory_recall", 0.8),
            success_record("web_search", 0.8),
            success_record("memory_store", 0.8),
        ];
        let verdict = engine.evaluate(&records, ComplexityTier::Medium, &key);

        let adaptive = strategy(&verdict, StrategyKind::AdaptiveLearning);
        assert!(adaptive.converged, "0.8 >= base threshold 0.75");
        assert!(adaptive.rationale.contains("First execution"));
    }

    #[test]
    fn adaptive_learning_raises_the_bar_with_history() {
        let (engine, store) = engine_with_store();
        let key = medium_key();
        // Seed history averaging 0.70 -> adaptive threshold 0.80.
        store.record(&key, 0.70);

        let records = vec![
            success_record("memory_recall", 0.78),
            success_record("web_search", 0.78),
        ];
        let verdict = engine.evaluate(&records, ComplexityTier::Medium, &key);

        let adaptive = strategy(&verdict, StrategyKind::AdaptiveLearning);
        assert!(!adaptive.converged, "0.78 below adaptive threshold 0.80");
        assert!(adaptive.score > 0.9);
    }

    #[test]
    fn adaptive_threshold_is_capped_at_nine_tenths() {
        let (engine, store) = engine_with_store();
        let key = medium_key();
        store.record(&key, 0.88);

        let records = vec![
            success_record("memory_recall", 0.91),
            success_record("web_search", 0.91),
        ];
        let verdict = engine.evaluate(&records, ComplexityTier::Expert, &key);

        let adaptive = strategy(&verdict, StrategyKind::AdaptiveLearning);
        // Threshold would be 0.98 uncapped; the 0.9 cap lets 0.91 pass.
        assert!(adaptive.converged);
    }

    #[test]
    fn zero_records_yield_fixed_no_data_verdict() {
        let (engine, store) = engine_with_store();
        let key = medium_key();

        let verdict = engine.evaluate(&[], ComplexityTier::Medium, &key);

        assert!(!verdict.converged);
        assert_eq!(verdict.reason, "No results to analyze");
        assert!(store.get(&key).is_none(), "no mean recorded without data");
    }

    #[test]
    fn all_failed_records_yield_no_data_verdict() {
        let (engine, store) = engine_with_store();
        let key = medium_key();
        let records = vec![failure_record("memory_recall"), failure_record("web_search")];

        let verdict = engine.evaluate(&records, ComplexityTier::Medium, &key);

        assert!(!verdict.converged);
        assert_eq!(verdict.reason, "No successful results with confidence");
        assert!(store.get(&key).is_none());
    }

    #[test]
    fn evaluation_records_mean_confidence_and_outcome() {
        let (engine, store) = engine_with_store();
        let key = medium_key();
        let records = vec![
            success_record("memory_recall", 0.8),
            success_record("web_search", 0.9),
        ];

        engine.evaluate(&records, ComplexityTier::Medium, &key);

        let perf = store.get(&key).unwrap();
        assert_eq!(perf.executions, 1);
        assert!((perf.average_confidence - 0.85).abs() < 1e-9);
        assert_eq!(store.learning_insights().total_runs, 1);
    }

    #[test]
    fn primary_strategy_has_highest_score() {
        let (engine, _store) = engine_with_store();
        let records = vec![
            success_record("memory_recall", 0.92),
            success_record("web_search", 0.88),
            success_record("memory_store", 0.90),
        ];

        let verdict = engine.evaluate(&records, ComplexityTier::Medium, &medium_key());

        let best = verdict
            .strategy_results
            .iter()
            .filter(|r| r.is_active())
            .map(|r| r.score)
            .fold(f64::MIN, f64::max);
        assert!(
            (strategy(&verdict, verdict.primary_strategy).score - best).abs() < 1e-9
        );
    }

    #[test]
    fn mixed_failures_lower_the_vote() {
        let (engine, _store) = engine_with_store();
        // One success out of three: success rate 0.33 blocks the
        // confidence-threshold gate even though confidence is high.
        let records = vec![
            success_record("memory_recall", 0.95),
            failure_record("web_search"),
            failure_record("memory_store"),
        ];

        let verdict = engine.evaluate(&records, ComplexityTier::Medium, &medium_key());

        let threshold = strategy(&verdict, StrategyKind::ConfidenceThreshold);
        assert!(!threshold.converged);
        // Consensus (0.25) and adaptive (0.15) may still vote, but without
        // the confidence-threshold weight the 0.5 bar is out of reach.
        assert!(verdict.vote_weight < 0.5);
        assert!(!verdict.converged);
    }

    #[test]
    fn stdev_is_sample_deviation() {
        assert!(stdev(&[0.9]).abs() < f64::EPSILON);
        let std = stdev(&[0.92, 0.88, 0.90]);
        assert!((std - 0.02).abs() < 1e-9);
    }
}
