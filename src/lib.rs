//! Ponder - Hierarchical Reasoning Orchestrator
//!
//! Ponder runs free-text queries through a multi-step reasoning pipeline:
//! it classifies the query's complexity, selects an ordered pattern of
//! external reasoning-tool invocations for that tier, executes the
//! pattern with bounded retries and context chaining, and decides via a
//! multi-strategy convergence analysis whether the accumulated results
//! are sufficient to stop.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain`): Pure models, port traits, and errors
//! - **Service Layer** (`services`): Classifier, orchestrator,
//!   convergence engine, performance store, insight reporter
//! - **Application Layer** (`application`): The `ReasoningEngine` facade
//! - **Infrastructure Layer** (`infrastructure`): Tool registry and
//!   config loading
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ponder::application::ReasoningEngine;
//! use ponder::infrastructure::tools::builtin_registry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = ReasoningEngine::with_defaults(Arc::new(builtin_registry()));
//!     let report = engine.execute("What is machine learning?").await?;
//!     println!("converged: {}", report.verdict.converged);
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::ReasoningEngine;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    pattern_for, ComplexityTier, Config, ConvergenceVerdict, ExecutionRecord, HierarchyLevel,
    PatternKey, RunReport, StrategyKind, ToolRole,
};
pub use domain::ports::{ToolError, ToolInvoker, ToolRequest, ToolResponse};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::tools::{builtin_registry, ToolHandler, ToolRegistry};
pub use services::{
    ComplexityClassifier, ConvergenceEngine, InsightReporter, PatternPerformanceStore,
};
