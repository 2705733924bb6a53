pub mod tool_invoker;

pub use tool_invoker::{ToolError, ToolInvoker, ToolRequest, ToolResponse};
