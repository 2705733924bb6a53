pub mod complexity;
pub mod config;
pub mod execution;
pub mod pattern;
pub mod verdict;

pub use complexity::ComplexityTier;
pub use config::{Config, ConvergenceConfig, LoggingConfig, RetryConfig};
pub use execution::{ExecutionRecord, RunReport};
pub use pattern::{pattern_for, HierarchyLevel, PatternKey, ToolRole};
pub use verdict::{recommendation, ConvergenceVerdict, StrategyKind, StrategyResult};
