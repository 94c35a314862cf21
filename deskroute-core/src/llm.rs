//! Tool-calling primitives shared by the generation backends and handlers

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A handler declaration exposed to the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

/// A handler invocation requested by the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Provider-assigned call id. Gemini does not assign one, so adapters
    /// synthesize it from the tool name.
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
}

/// One scratchpad entry: an invocation and the serialized handler output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExchange {
    pub invocation: ToolInvocation,
    pub output: String,
}

impl ToolExchange {
    /// Handler output parsed back into JSON, falling back to a string value.
    pub fn output_value(&self) -> Value {
        serde_json::from_str(&self.output).unwrap_or_else(|_| Value::String(self.output.clone()))
    }
}
