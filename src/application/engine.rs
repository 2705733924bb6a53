//! The reasoning engine: classify -> orchestrate -> execute -> converge.
//!
//! `ReasoningEngine::execute` is the sole entry point external callers
//! (CLI, demos, services) invoke. The tool invoker and the performance
//! store are injected; the engine owns no transport and no global state.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{pattern_for, Config, PatternKey, RunReport, ToolRole};
use crate::domain::ports::ToolInvoker;
use crate::services::{
    ComplexityClassifier, ConvergenceEngine, LearningInsights, PatternPerformanceStore,
    PatternRunner, RetryPolicy,
};

/// Orchestrates the full reasoning pipeline for one query at a time.
///
/// Independent engines (or concurrent `execute` calls on one engine) may
/// run in parallel; they share only the injected performance store.
pub struct ReasoningEngine<I: ToolInvoker> {
    classifier: ComplexityClassifier,
    runner: PatternRunner<I>,
    convergence: ConvergenceEngine,
    store: Arc<PatternPerformanceStore>,
}

impl<I: ToolInvoker> ReasoningEngine<I> {
    /// Create an engine over an injected invoker and performance store.
    pub fn new(invoker: Arc<I>, store: Arc<PatternPerformanceStore>, config: &Config) -> Self {
        Self {
            classifier: ComplexityClassifier::new(),
            runner: PatternRunner::new(
                invoker,
                RetryPolicy::from(&config.retry),
                config.convergence.context_excerpt_chars,
            ),
            convergence: ConvergenceEngine::new(Arc::clone(&store), &config.convergence),
            store,
        }
    }

    /// Convenience constructor with default configuration and a fresh
    /// private store.
    pub fn with_defaults(invoker: Arc<I>) -> Self {
        Self::new(
            invoker,
            Arc::new(PatternPerformanceStore::new()),
            &Config::default(),
        )
    }

    /// Run the complete pipeline for a query.
    ///
    /// Always returns a report — possibly one whose verdict is
    /// non-converged with low confidence — except for structural errors
    /// (invalid pattern, invalid retry configuration, cancellation),
    /// which surface as `DomainError`.
    pub async fn execute(&self, query: &str) -> DomainResult<RunReport> {
        self.execute_cancellable(query, &CancellationToken::new())
            .await
    }

    /// `execute` with cooperative cancellation between steps.
    pub async fn execute_cancellable(
        &self,
        query: &str,
        token: &CancellationToken,
    ) -> DomainResult<RunReport> {
        let started_at = Utc::now();
        let timer = Instant::now();

        let tier = self.classifier.classify(query);
        let pattern = pattern_for(tier);
        validate_pattern(tier.as_str(), &pattern)?;
        let pattern_key = PatternKey::new(tier, &pattern);

        info!(
            %tier,
            pattern_len = pattern.len(),
            pattern_key = %pattern_key,
            "Starting reasoning run"
        );

        let records = self.runner.run(&pattern, query, token).await?;
        let verdict = self.convergence.evaluate(&records, tier, &pattern_key);

        let report = RunReport {
            run_id: Uuid::new_v4(),
            query: query.to_string(),
            tier,
            pattern,
            pattern_key,
            records,
            verdict,
            started_at,
            total_duration: timer.elapsed(),
        };

        info!(
            run_id = %report.run_id,
            converged = report.verdict.converged,
            combined_score = report.verdict.combined_score,
            duration_ms = report.total_duration.as_millis(),
            "Reasoning run completed"
        );

        Ok(report)
    }

    /// Aggregate view of what the shared store has learned so far.
    pub fn learning_insights(&self) -> LearningInsights {
        self.store.learning_insights()
    }

    /// The performance store this engine records into.
    pub fn store(&self) -> &Arc<PatternPerformanceStore> {
        &self.store
    }
}

/// Structural pattern validation, run before any tool invocation.
fn validate_pattern(tier: &str, pattern: &[ToolRole]) -> DomainResult<()> {
    if pattern.is_empty() {
        return Err(DomainError::InvalidPattern {
            tier: tier.to_string(),
            reason: "pattern is empty".to_string(),
        });
    }
    if let Some(role) = pattern.iter().find(|r| r.tool_id.is_empty()) {
        return Err(DomainError::InvalidPattern {
            tier: tier.to_string(),
            reason: format!("role with empty tool id (intent: {})", role.intent),
        });
    }
    Ok(())
}
