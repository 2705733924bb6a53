use anyhow::Result;
use serde_json::json;

use crate::cli::display::format_pattern_table;
use crate::domain::models::{pattern_for, PatternKey};
use crate::services::ComplexityClassifier;

/// Handle the `classify` command: show a query's tier and pattern
/// without executing anything.
pub fn execute(text: String, json: bool) -> Result<()> {
    let tier = ComplexityClassifier::new().classify(&text);
    let pattern = pattern_for(tier);
    let key = PatternKey::new(tier, &pattern);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "query": text,
                "complexity": tier,
                "pattern_key": key,
                "pattern": pattern,
            }))?
        );
    } else {
        println!("Query: {text}");
        println!("Complexity: {tier}");
        println!("Pattern key: {key}\n");
        println!("{}", format_pattern_table(&pattern));
    }

    Ok(())
}
