//! Insight and next-action generation from a finished run.
//!
//! Advisory output only: nothing here feeds back into control decisions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::models::RunReport;

/// Runs slower than this earn a performance note.
const SLOW_RUN: Duration = Duration::from_secs(10);

/// Human-readable takeaways from one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub insights: Vec<String>,
    pub next_actions: Vec<String>,
}

/// Turns a run report into insights and suggested next actions.
#[derive(Debug, Default)]
pub struct InsightReporter;

impl InsightReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, report: &RunReport) -> Insights {
        let mut insights = Vec::new();
        let mut next_actions = Vec::new();

        let successful = report.successful_tools();
        let failed = report.failed_tools();
        let success_rate = if report.records.is_empty() {
            0.0
        } else {
            successful.len() as f64 / report.records.len() as f64
        };

        if report.verdict.converged {
            insights.push(format!(
                "Query successfully processed with {:.0}% tool success rate",
                success_rate * 100.0
            ));
            insights.push(format!(
                "High confidence results achieved: {:.2}",
                report.verdict.combined_score
            ));
            if !successful.is_empty() {
                insights.push(format!("Effective tools: {}", successful.join(", ")));
            }
            next_actions.push("Review synthesis results for actionable insights".to_string());
            next_actions.push("Consider expanding analysis to related areas".to_string());
        } else {
            insights.push(format!(
                "Convergence not achieved: {}",
                report.verdict.reason
            ));
            if !failed.is_empty() {
                insights.push(format!("Failed tools need attention: {}", failed.join(", ")));
                next_actions.push("Debug failed tool executions".to_string());
                next_actions.push("Consider alternative tool combinations".to_string());
            }
            next_actions.push("Retry with adjusted parameters".to_string());
            next_actions.push("Investigate root causes of low confidence".to_string());
        }

        if report.total_duration > SLOW_RUN {
            insights.push(format!(
                "Long execution time: {:.1}s",
                report.total_duration.as_secs_f64()
            ));
            next_actions.push("Optimize tool selection for better performance".to_string());
        }

        Insights {
            insights,
            next_actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use crate::domain::models::pattern::pattern_for;
    use crate::domain::models::{
        ComplexityTier, ConvergenceVerdict, ExecutionRecord, PatternKey,
    };

    fn report(records: Vec<ExecutionRecord>, converged: bool) -> RunReport {
        let pattern = pattern_for(ComplexityTier::Medium);
        let mut verdict = ConvergenceVerdict::no_data("Low confidence");
        verdict.converged = converged;
        verdict.combined_score = if converged { 0.9 } else { 0.3 };
        RunReport {
            run_id: Uuid::new_v4(),
            query: "q".to_string(),
            tier: ComplexityTier::Medium,
            pattern_key: PatternKey::new(ComplexityTier::Medium, &pattern),
            pattern,
            records,
            verdict,
            started_at: Utc::now(),
            total_duration: Duration::from_millis(120),
        }
    }

    #[test]
    fn converged_runs_highlight_effective_tools() {
        let records = vec![ExecutionRecord::success(
            "memory_recall",
            0.9,
            Duration::from_millis(10),
            0,
            json!({}),
        )];
        let insights = InsightReporter::new().generate(&report(records, true));

        assert!(insights.insights.iter().any(|i| i.contains("100% tool success")));
        assert!(insights.insights.iter().any(|i| i.contains("memory_recall")));
        assert!(!insights.next_actions.is_empty());
    }

    #[test]
    fn failed_runs_point_at_failing_tools() {
        let records = vec![
            ExecutionRecord::success("memory_recall", 0.5, Duration::from_millis(10), 0, json!({})),
            ExecutionRecord::failure("web_search", Duration::from_millis(10), 1, "down"),
        ];
        let insights = InsightReporter::new().generate(&report(records, false));

        assert!(insights.insights.iter().any(|i| i.contains("web_search")));
        assert!(insights
            .next_actions
            .iter()
            .any(|a| a.contains("Debug failed tool executions")));
    }

    #[test]
    fn slow_runs_get_a_performance_note() {
        let mut slow = report(vec![], false);
        slow.total_duration = Duration::from_secs(12);
        let insights = InsightReporter::new().generate(&slow);

        assert!(insights.insights.iter().any(|i| i.contains("Long execution time")));
    }
}
