//! Pattern execution with bounded retries and context chaining.
//!
//! The orchestrator walks a pattern strictly in order — each step's
//! parameters depend on the textual context accumulated by its
//! predecessors, so there is no intra-run parallelism. Tool failures are
//! recoverable: a role that exhausts its retries produces a failed record
//! and the run continues. The run always returns one record per role.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ExecutionRecord, RetryConfig, ToolRole};
use crate::domain::ports::{ToolInvoker, ToolRequest};

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Retry policy with linear backoff for tool invocations.
///
/// The delay before re-attempting grows linearly with the attempt index:
/// `base_backoff * (attempt + 1)`, so successive delays strictly increase.
/// Backoff sleeps are a per-run property; they never block other runs.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts per tool role. Must be at least 1.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds.
    pub base_backoff_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            base_backoff_ms,
        }
    }

    /// Delay before the attempt following `attempt` (0-indexed).
    fn backoff_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_backoff_ms.saturating_mul(u64::from(attempt) + 1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 500)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.base_backoff_ms)
    }
}

// ---------------------------------------------------------------------------
// PatternRunner
// ---------------------------------------------------------------------------

/// Executes a tool pattern against an injected invoker.
pub struct PatternRunner<I: ToolInvoker> {
    invoker: Arc<I>,
    policy: RetryPolicy,
    /// Characters of each successful payload kept in the running context.
    context_excerpt_chars: usize,
}

impl<I: ToolInvoker> PatternRunner<I> {
    pub fn new(invoker: Arc<I>, policy: RetryPolicy, context_excerpt_chars: usize) -> Self {
        Self {
            invoker,
            policy,
            context_excerpt_chars,
        }
    }

    /// Run every role in `pattern` in order, threading context between
    /// steps, and return one terminal record per role.
    ///
    /// # Errors
    /// - `ValidationFailed` when the policy allows zero attempts (the
    ///   one-record-per-role invariant could not hold).
    /// - `Cancelled` when `token` is cancelled before a step starts. An
    ///   in-flight invocation is left to the invoker's own semantics.
    pub async fn run(
        &self,
        pattern: &[ToolRole],
        query: &str,
        token: &CancellationToken,
    ) -> DomainResult<Vec<ExecutionRecord>> {
        if self.policy.max_retries == 0 {
            return Err(DomainError::ValidationFailed(
                "max_retries must be at least 1".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(pattern.len());
        let mut context = query.to_string();

        for (step, role) in pattern.iter().enumerate() {
            if token.is_cancelled() {
                return Err(DomainError::Cancelled { step });
            }

            let record = self.run_role(role, step, &context).await;
            if record.success {
                let excerpt = payload_excerpt(&record.payload, self.context_excerpt_chars);
                if !excerpt.is_empty() {
                    context = format!("{context} | {excerpt}");
                }
            }
            records.push(record);
        }

        Ok(records)
    }

    /// Attempt one role up to `max_retries` times with linear backoff.
    ///
    /// Always terminates in a record: success on the first good attempt,
    /// or a failed record carrying the last error message.
    async fn run_role(&self, role: &ToolRole, step: usize, context: &str) -> ExecutionRecord {
        let started = Instant::now();
        let params = build_params(role, step, context);
        let mut last_error = String::new();

        for attempt in 0..self.policy.max_retries {
            let request = ToolRequest::new(role.tool_id.clone(), params.clone());
            match self.invoker.invoke(request).await {
                Ok(response) => {
                    debug!(
                        tool = %role.tool_id,
                        step,
                        attempt,
                        confidence = response.confidence,
                        "Tool invocation succeeded"
                    );
                    return ExecutionRecord::success(
                        role.tool_id.clone(),
                        response.confidence,
                        started.elapsed(),
                        attempt,
                        response.payload,
                    );
                }
                Err(err) => {
                    last_error = err.to_string();
                    if attempt + 1 < self.policy.max_retries {
                        let backoff = self.policy.backoff_for(attempt);
                        warn!(
                            tool = %role.tool_id,
                            step,
                            attempt,
                            error = %last_error,
                            "Tool invocation failed; retrying in {backoff:?}"
                        );
                        sleep(backoff).await;
                    }
                }
            }
        }

        warn!(
            tool = %role.tool_id,
            step,
            error = %last_error,
            "Tool invocation exhausted retries"
        );
        ExecutionRecord::failure(
            role.tool_id.clone(),
            started.elapsed(),
            self.policy.max_retries - 1,
            last_error,
        )
    }
}

/// Parameters handed to a tool: the running context as the query, plus the
/// role's intent and level for the tool's own use.
fn build_params(role: &ToolRole, step: usize, context: &str) -> Value {
    json!({
        "query": context,
        "intent": role.intent,
        "level": role.level.as_str(),
        "step": step,
    })
}

/// Bounded textual excerpt of a payload for context chaining.
///
/// Strings are used verbatim; other payloads are compact-serialized.
/// Truncation is char-boundary safe.
fn payload_excerpt(payload: &Value, max_chars: usize) -> String {
    let text = match payload {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.chars().take(max_chars).collect()
}
