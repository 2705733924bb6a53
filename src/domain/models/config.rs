use serde::{Deserialize, Serialize};

/// Main configuration structure for Ponder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Retry policy for tool invocations
    #[serde(default)]
    pub retry: RetryConfig,

    /// Convergence engine tuning
    #[serde(default)]
    pub convergence: ConvergenceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Retry policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum attempts per tool role (at least 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; the delay before attempt N+1 is
    /// `base_backoff_ms * (N + 1)`
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_base_backoff_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
        }
    }
}

/// Convergence engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConvergenceConfig {
    /// Base confidence threshold used by the adaptive-learning strategy on
    /// its first encounter with a pattern
    #[serde(default = "default_base_threshold")]
    pub base_threshold: f64,

    /// Characters of each successful payload excerpt chained into the
    /// running context
    #[serde(default = "default_context_excerpt_chars")]
    pub context_excerpt_chars: usize,
}

fn default_base_threshold() -> f64 {
    0.75
}

const fn default_context_excerpt_chars() -> usize {
    150
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            base_threshold: default_base_threshold(),
            context_excerpt_chars: default_context_excerpt_chars(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
