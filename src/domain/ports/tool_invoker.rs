use async_trait::async_trait;
use serde_json::Value;

/// Tool invocation request.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub tool_id: String,
    pub params: Value,
}

impl ToolRequest {
    pub fn new(tool_id: impl Into<String>, params: Value) -> Self {
        Self {
            tool_id: tool_id.into(),
            params,
        }
    }
}

/// Successful tool invocation response.
#[derive(Debug, Clone)]
pub struct ToolResponse {
    /// Opaque result payload.
    pub payload: Value,
    /// Tool-reported confidence in [0, 1].
    pub confidence: f64,
}

impl ToolResponse {
    pub fn new(payload: Value, confidence: f64) -> Self {
        Self {
            payload,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Error types specific to tool invocation.
///
/// Every variant is recoverable at the pattern level: the orchestrator
/// retries with backoff and, after exhausting its attempts, degrades the
/// failure into an unsuccessful execution record.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Tool execution timed out")]
    Timeout,
}

/// Port trait for executing one reasoning tool call.
///
/// Implementations are supplied by the caller; the core never assumes a
/// specific transport and must work against a pure in-memory stub.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Invoke a tool by identifier with a parameter mapping.
    ///
    /// # Errors
    /// Returns `ToolError` when the tool is unknown, rejects its
    /// arguments, fails, or times out. All variants are retryable from the
    /// orchestrator's point of view.
    async fn invoke(&self, request: ToolRequest) -> Result<ToolResponse, ToolError>;
}
