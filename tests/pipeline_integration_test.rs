//! End-to-end tests for the reasoning pipeline.
//!
//! These exercise the full classify -> orchestrate -> execute -> converge
//! flow against the built-in tool registry and against in-memory invoker
//! stubs, including failure degradation, cancellation, and concurrent
//! runs sharing one performance store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use ponder::application::ReasoningEngine;
use ponder::domain::errors::DomainError;
use ponder::domain::models::{Config, ComplexityTier, RetryConfig};
use ponder::domain::ports::{ToolError, ToolInvoker, ToolRequest, ToolResponse};
use ponder::infrastructure::tools::builtin_registry;
use ponder::services::{InsightReporter, PatternPerformanceStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Invoker stub that succeeds for every tool with a fixed confidence.
struct FixedConfidence(f64);

#[async_trait]
impl ToolInvoker for FixedConfidence {
    async fn invoke(&self, request: ToolRequest) -> Result<ToolResponse, ToolError> {
        Ok(ToolResponse::new(
            json!({"tool": request.tool_id, "ok": true}),
            self.0,
        ))
    }
}

/// Invoker stub that always fails.
struct AlwaysFails;

#[async_trait]
impl ToolInvoker for AlwaysFails {
    async fn invoke(&self, _request: ToolRequest) -> Result<ToolResponse, ToolError> {
        Err(ToolError::ExecutionFailed("tool offline".to_string()))
    }
}

fn fast_config() -> Config {
    Config {
        retry: RetryConfig {
            max_retries: 2,
            base_backoff_ms: 1,
        },
        ..Config::default()
    }
}

fn engine_with<I: ToolInvoker>(invoker: I) -> ReasoningEngine<I> {
    ReasoningEngine::new(
        Arc::new(invoker),
        Arc::new(PatternPerformanceStore::new()),
        &fast_config(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn simple_query_converges_with_single_step() {
    let engine = engine_with(FixedConfidence(0.8));

    let report = engine.execute("What is machine learning?").await.unwrap();

    assert_eq!(report.tier, ComplexityTier::Simple);
    assert_eq!(report.pattern.len(), 1);
    assert_eq!(report.records.len(), 1);
    assert!(report.records[0].success);
    // 0.8 clears the Simple threshold (0.65) and the cold-start base
    // threshold (0.75): confidence (0.40) + adaptive (0.15) votes reach 0.5.
    assert!(report.verdict.converged);
}

#[tokio::test]
async fn expert_query_runs_six_steps_through_builtins() {
    let engine = ReasoningEngine::new(
        Arc::new(builtin_registry()),
        Arc::new(PatternPerformanceStore::new()),
        &fast_config(),
    );

    let report = engine
        .execute("How might recursive self-improvement bootstrap AGI?")
        .await
        .unwrap();

    assert_eq!(report.tier, ComplexityTier::Expert);
    assert_eq!(report.records.len(), 6);
    assert!(report.all_succeeded());
    assert!(report.verdict.converged);
}

#[tokio::test]
async fn failing_tools_degrade_to_a_completed_non_converged_run() {
    let engine = engine_with(AlwaysFails);

    let report = engine
        .execute("Compare and contrast SQL and NoSQL databases")
        .await
        .unwrap();

    // Medium pattern: every role completes with a failed record.
    assert_eq!(report.tier, ComplexityTier::Medium);
    assert_eq!(report.records.len(), 3);
    for record in &report.records {
        assert!(!record.success);
        assert_eq!(record.retry_count, 1);
        assert!(record.error.is_some());
    }
    assert!(!report.verdict.converged);
    assert_eq!(report.verdict.reason, "No successful results with confidence");

    // A degraded run still produces actionable output.
    let insights = InsightReporter::new().generate(&report);
    assert!(!insights.next_actions.is_empty());
}

#[tokio::test]
async fn cancellation_is_a_structural_error_not_a_verdict() {
    let engine = engine_with(FixedConfidence(0.9));
    let token = CancellationToken::new();
    token.cancel();

    let result = engine
        .execute_cancellable("What is machine learning?", &token)
        .await;

    assert!(matches!(result, Err(DomainError::Cancelled { .. })));
}

#[tokio::test]
async fn empty_registry_reports_unknown_tools_per_record() {
    let engine = ReasoningEngine::new(
        Arc::new(ponder::ToolRegistry::new()),
        Arc::new(PatternPerformanceStore::new()),
        &fast_config(),
    );

    let report = engine.execute("What is machine learning?").await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert!(report.records[0]
        .error
        .as_deref()
        .unwrap()
        .contains("Unknown tool"));
}

#[tokio::test]
async fn repeated_runs_feed_the_adaptive_strategy() {
    let store = Arc::new(PatternPerformanceStore::new());
    let engine = ReasoningEngine::new(
        Arc::new(builtin_registry()),
        Arc::clone(&store),
        &fast_config(),
    );

    let query = "What is machine learning?";
    let first = engine.execute(query).await.unwrap();
    let second = engine.execute(query).await.unwrap();

    assert_eq!(first.pattern_key, second.pattern_key);
    let perf = store.get(&second.pattern_key).unwrap();
    assert_eq!(perf.executions, 2);
    assert_eq!(store.learning_insights().total_runs, 2);
}

#[tokio::test]
async fn concurrent_runs_share_the_store_without_losing_updates() {
    let store = Arc::new(PatternPerformanceStore::new());
    let engine = Arc::new(ReasoningEngine::new(
        Arc::new(builtin_registry()),
        Arc::clone(&store),
        &fast_config(),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.execute("What is machine learning?").await.unwrap()
        }));
    }
    let mut key = None;
    for handle in handles {
        let report = handle.await.unwrap();
        key = Some(report.pattern_key);
    }

    let perf = store.get(&key.unwrap()).unwrap();
    assert_eq!(perf.executions, 8, "every run's append must survive");
    assert_eq!(store.learning_insights().total_runs, 8);
}

#[tokio::test]
async fn json_report_round_trips() {
    let engine = engine_with(FixedConfidence(0.85));
    let report = engine.execute("What is machine learning?").await.unwrap();

    let serialized = serde_json::to_string(&report).unwrap();
    let restored: ponder::RunReport = serde_json::from_str(&serialized).unwrap();
    assert_eq!(restored.run_id, report.run_id);
    assert_eq!(restored.records.len(), report.records.len());
    assert_eq!(restored.verdict.converged, report.verdict.converged);
}
