pub mod builtin;
pub mod registry;

pub use builtin::builtin_registry;
pub use registry::{ToolHandler, ToolRegistry};
