use anyhow::Result;
use serde_json::json;

use crate::cli::display::format_pattern_table;
use crate::domain::models::{pattern_for, ComplexityTier};

/// Handle the `patterns` command: print the catalog for every tier.
pub fn execute(json: bool) -> Result<()> {
    if json {
        let catalog: serde_json::Map<String, serde_json::Value> = ComplexityTier::all()
            .iter()
            .map(|tier| (tier.as_str().to_string(), json!(pattern_for(*tier))))
            .collect();
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        for tier in ComplexityTier::all() {
            let pattern = pattern_for(tier);
            println!("{tier} ({} steps)", pattern.len());
            println!("{}\n", format_pattern_table(&pattern));
        }
    }

    Ok(())
}
