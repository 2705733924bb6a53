use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ReasoningEngine;
use crate::cli::display::{format_records_table, print_insights, print_verdict};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::tools::builtin_registry;
use crate::services::InsightReporter;

/// Handle the `query` command: run one query end-to-end against the
/// built-in tool registry.
pub async fn execute(
    text: String,
    max_retries: Option<u32>,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(max_retries) = max_retries {
        config.retry.max_retries = max_retries;
    }
    if let Some(threshold) = threshold {
        config.convergence.base_threshold = threshold;
    }
    ConfigLoader::validate(&config)?;

    let engine = ReasoningEngine::new(
        Arc::new(builtin_registry()),
        Arc::new(crate::services::PatternPerformanceStore::new()),
        &config,
    );

    let report = engine
        .execute(&text)
        .await
        .context("Reasoning run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Query: {}\nComplexity: {} ({} steps)\n",
            report.query,
            report.tier,
            report.pattern.len()
        );
        println!("{}", format_records_table(&report));
        println!();
        print_verdict(&report);
        print_insights(&InsightReporter::new().generate(&report));
    }

    Ok(())
}
