//! MCP tools: argument schemas, the registry and one handler module per area

pub mod args;
pub mod dm;
pub mod engage;
pub mod graph;
pub mod registry;
pub mod trends;
pub mod tweet;
pub mod user;

use serde_json::Value;

/// What a handler hands back to the registry on success
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub message: String,
    pub data: Value,
}

impl ToolOutput {
    pub fn new(message: impl Into<String>, data: Value) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}
