//! Execution records and the complete run report.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::complexity::ComplexityTier;
use super::pattern::{PatternKey, ToolRole};
use super::verdict::ConvergenceVerdict;

/// Outcome of one tool role in a pattern, terminal after success or
/// exhausted retries. Immutable once created; owned by the run that
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Tool identifier that was invoked.
    pub tool_id: String,
    /// Whether the invocation ultimately succeeded.
    pub success: bool,
    /// Confidence reported by the tool, in [0, 1]. 0.0 on failure.
    pub confidence: f64,
    /// Wall-clock time spent on this role, retries included.
    #[serde(with = "duration_millis")]
    pub latency: Duration,
    /// Zero-based index of the attempt that terminated this role.
    /// Always strictly less than the configured maximum attempts.
    pub retry_count: u32,
    /// Last failure message when `success` is false.
    pub error: Option<String>,
    /// Opaque result payload from the tool. `Value::Null` on failure.
    pub payload: Value,
}

impl ExecutionRecord {
    /// Record for a role that succeeded on attempt `retry_count`.
    pub fn success(tool_id: impl Into<String>, confidence: f64, latency: Duration, retry_count: u32, payload: Value) -> Self {
        Self {
            tool_id: tool_id.into(),
            success: true,
            confidence: confidence.clamp(0.0, 1.0),
            latency,
            retry_count,
            error: None,
            payload,
        }
    }

    /// Record for a role that exhausted its retries.
    pub fn failure(tool_id: impl Into<String>, latency: Duration, retry_count: u32, error: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            success: false,
            confidence: 0.0,
            latency,
            retry_count,
            error: Some(error.into()),
            payload: Value::Null,
        }
    }
}

/// Complete result of one pipeline run: the sole value the inbound
/// `execute` entry point returns. Read-only downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub query: String,
    pub tier: ComplexityTier,
    pub pattern: Vec<ToolRole>,
    pub pattern_key: PatternKey,
    pub records: Vec<ExecutionRecord>,
    pub verdict: ConvergenceVerdict,
    pub started_at: DateTime<Utc>,
    #[serde(with = "duration_millis")]
    pub total_duration: Duration,
}

impl RunReport {
    /// True when every role in the pattern succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.records.iter().all(|r| r.success)
    }

    /// Tool ids that succeeded, in pattern order, deduplicated.
    pub fn successful_tools(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in self.records.iter().filter(|r| r.success) {
            if !seen.contains(&record.tool_id.as_str()) {
                seen.push(record.tool_id.as_str());
            }
        }
        seen
    }

    /// Tool ids that failed after exhausting retries, deduplicated.
    pub fn failed_tools(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in self.records.iter().filter(|r| !r.success) {
            if !seen.contains(&record.tool_id.as_str()) {
                seen.push(record.tool_id.as_str());
            }
        }
        seen
    }
}

/// Serialize `Duration` as integer milliseconds so reports stay compact
/// and stable across serde versions.
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        let record = ExecutionRecord::success("memory_recall", 1.7, Duration::from_millis(5), 0, json!({}));
        assert!((record.confidence - 1.0).abs() < f64::EPSILON);

        let record = ExecutionRecord::success("memory_recall", -0.2, Duration::ZERO, 0, json!({}));
        assert!(record.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn failure_record_has_zero_confidence_and_error() {
        let record = ExecutionRecord::failure("web_search", Duration::ZERO, 1, "timed out");
        assert!(!record.success);
        assert!(record.confidence.abs() < f64::EPSILON);
        assert_eq!(record.error.as_deref(), Some("timed out"));
        assert_eq!(record.payload, Value::Null);
    }
}
