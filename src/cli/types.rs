//! CLI type definitions.
//!
//! This module contains the clap command structures that define the CLI
//! interface.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ponder")]
#[command(about = "Ponder - hierarchical reasoning orchestrator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a query through the full reasoning pipeline
    Query {
        /// Query text (positional argument)
        text: String,

        /// Maximum attempts per tool role
        #[arg(short, long)]
        max_retries: Option<u32>,

        /// Base convergence threshold for unseen patterns
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Classify a query's complexity and show its pattern
    Classify {
        /// Query text
        text: String,
    },

    /// Show the execution pattern catalog for every tier
    Patterns,

    /// Run the four canonical sample queries and show what was learned
    Demo,
}
