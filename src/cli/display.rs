//! Table and text formatting for CLI output.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use console::style;

use crate::domain::models::{RunReport, ToolRole};
use crate::services::{Insights, LearningInsights};

/// Render a pattern as a table of its ordered roles.
pub fn format_pattern_table(pattern: &[ToolRole]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Tool", "Level", "Intent"]);

    for (i, role) in pattern.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&role.tool_id),
            Cell::new(role.level.as_str()),
            Cell::new(&role.intent),
        ]);
    }
    table
}

/// Render the execution records of a run.
pub fn format_records_table(report: &RunReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tool", "Status", "Confidence", "Retries", "Latency"]);

    for record in &report.records {
        let status = if record.success { "ok" } else { "failed" };
        table.add_row(vec![
            Cell::new(&record.tool_id),
            Cell::new(status),
            Cell::new(format!("{:.2}", record.confidence)),
            Cell::new(record.retry_count),
            Cell::new(format!("{}ms", record.latency.as_millis())),
        ]);
    }
    table
}

/// Print the verdict summary with styled headline.
pub fn print_verdict(report: &RunReport) {
    let headline = if report.verdict.converged {
        style("converged").green().bold()
    } else {
        style("not converged").red().bold()
    };
    println!(
        "Verdict: {headline} (score {:.2}, vote {:.2})",
        report.verdict.combined_score, report.verdict.vote_weight
    );
    println!("Primary strategy: {}", report.verdict.primary_strategy);
    println!("Reason: {}", report.verdict.reason);
    println!("Recommendation: {}", report.verdict.recommendation);
}

/// Print insights and next actions as bullet lists.
pub fn print_insights(insights: &Insights) {
    if !insights.insights.is_empty() {
        println!("\n{}", style("Insights").bold());
        for line in &insights.insights {
            println!("  - {line}");
        }
    }
    if !insights.next_actions.is_empty() {
        println!("\n{}", style("Next actions").bold());
        for line in &insights.next_actions {
            println!("  - {line}");
        }
    }
}

/// Print what the performance store has learned so far.
pub fn print_learning_insights(learning: &LearningInsights) {
    println!("\n{}", style("Learning summary").bold());
    println!(
        "  Patterns learned: {}, executions: {}, converged runs: {}/{}",
        learning.total_patterns,
        learning.total_executions,
        learning.converged_runs,
        learning.total_runs
    );
    for top in &learning.top_patterns {
        println!(
            "  High performer: {} (avg confidence {:.2}, {} executions)",
            top.pattern_key, top.average_confidence, top.executions
        );
    }
}
