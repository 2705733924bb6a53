pub mod classifier;
pub mod convergence;
pub mod insights;
pub mod orchestrator;
pub mod performance;

pub use classifier::ComplexityClassifier;
pub use convergence::ConvergenceEngine;
pub use insights::{InsightReporter, Insights};
pub use orchestrator::{PatternRunner, RetryPolicy};
pub use performance::{LearningInsights, PatternPerformance, PatternPerformanceStore};
