use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use crate::application::ReasoningEngine;
use crate::cli::display::{print_learning_insights, print_verdict};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::tools::builtin_registry;
use crate::services::PatternPerformanceStore;

/// One canonical query per complexity tier.
const SAMPLE_QUERIES: [&str; 4] = [
    "What is machine learning?",
    "Compare and contrast quantum computing and classical computing",
    "Design a system for multi-region cache invalidation",
    "How might recursive self-improvement bootstrap AGI?",
];

/// Handle the `demo` command: run the canonical sample queries through
/// one engine so the adaptive-learning strategy accumulates history,
/// then print the learning summary.
pub async fn execute(json: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let engine = ReasoningEngine::new(
        Arc::new(builtin_registry()),
        Arc::new(PatternPerformanceStore::new()),
        &config,
    );

    let mut reports = Vec::with_capacity(SAMPLE_QUERIES.len());
    for query in SAMPLE_QUERIES {
        let report = engine
            .execute(query)
            .await
            .with_context(|| format!("Demo query failed: {query}"))?;
        if !json {
            println!("Query: {query}");
            println!(
                "  Complexity: {} | Pattern: {}",
                report.tier,
                report
                    .pattern
                    .iter()
                    .map(|r| r.tool_id.as_str())
                    .collect::<Vec<_>>()
                    .join(" -> ")
            );
            print_verdict(&report);
            println!();
        }
        reports.push(report);
    }

    let learning = engine.learning_insights();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "reports": reports,
                "learning": learning,
            }))?
        );
    } else {
        print_learning_insights(&learning);
    }

    Ok(())
}
