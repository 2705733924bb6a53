//! Tool registry: identifier -> handler lookup.
//!
//! The registry is the crate's reference `ToolInvoker` implementation.
//! Dispatch is a map lookup over one capability interface; adding a tool
//! is a registration, not a new conditional branch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{ToolError, ToolInvoker, ToolRequest, ToolResponse};

/// One registered tool capability.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool against a parameter mapping.
    async fn handle(&self, params: &Value) -> Result<ToolResponse, ToolError>;
}

/// Maps tool identifiers to handler implementations.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a tool identifier, replacing any previous
    /// registration for the same id.
    pub fn register(&mut self, tool_id: impl Into<String>, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(tool_id.into(), handler);
    }

    /// Registered tool identifiers, sorted for stable output.
    pub fn tool_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[async_trait]
impl ToolInvoker for ToolRegistry {
    async fn invoke(&self, request: ToolRequest) -> Result<ToolResponse, ToolError> {
        let handler = self
            .handlers
            .get(&request.tool_id)
            .ok_or_else(|| ToolError::UnknownTool(request.tool_id.clone()))?;
        debug!(tool = %request.tool_id, "Dispatching tool invocation");
        handler.handle(&request.params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(f64);

    #[async_trait]
    impl ToolHandler for Fixed {
        async fn handle(&self, _params: &Value) -> Result<ToolResponse, ToolError> {
            Ok(ToolResponse::new(json!({"ok": true}), self.0))
        }
    }

    #[tokio::test]
    async fn dispatches_to_registered_handler() {
        let mut registry = ToolRegistry::new();
        registry.register("echo", Arc::new(Fixed(0.7)));

        let response = registry
            .invoke(ToolRequest::new("echo", json!({})))
            .await
            .unwrap();
        assert!((response.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let registry = ToolRegistry::new();
        let err = registry
            .invoke(ToolRequest::new("missing", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(id) if id == "missing"));
    }

    #[tokio::test]
    async fn later_registration_replaces_earlier() {
        let mut registry = ToolRegistry::new();
        registry.register("echo", Arc::new(Fixed(0.3)));
        registry.register("echo", Arc::new(Fixed(0.9)));

        let response = registry
            .invoke(ToolRequest::new("echo", json!({})))
            .await
            .unwrap();
        assert!((response.confidence - 0.9).abs() < f64::EPSILON);
    }
}
