//! Handler dispatch for backend tool invocations

use crate::factory::{Inputs, TicketFactory};
use crate::registry::CategoryRegistry;
use deskroute_core::{DeskResult, HandlerResult, Timestamp, ToolInvocation, ToolSpec};
use serde_json::{json, Map, Value};

/// Routes tool invocations to the ticket factory and declares the tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketDispatcher {
    factory: TicketFactory,
}

impl TicketDispatcher {
    pub fn new(registry: CategoryRegistry) -> Self {
        Self {
            factory: TicketFactory::new(registry),
        }
    }

    pub fn factory(&self) -> &TicketFactory {
        &self.factory
    }

    /// One tool declaration per registered category.
    ///
    /// The requester id is never a parameter; it is injected at invocation.
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        self.factory
            .registry()
            .definitions()
            .iter()
            .map(|def| {
                let properties: Map<String, Value> = def
                    .required_inputs
                    .iter()
                    .map(|spec| {
                        (
                            spec.name.to_string(),
                            json!({ "type": "string", "description": spec.description }),
                        )
                    })
                    .collect();
                let required: Vec<&str> = def.required_inputs.iter().map(|s| s.name).collect();

                ToolSpec {
                    name: def.category.as_str().to_string(),
                    description: def.tool_description.to_string(),
                    parameters: json!({
                        "type": "object",
                        "properties": properties,
                        "required": required,
                    }),
                }
            })
            .collect()
    }

    /// Run the handler named by `invocation`.
    ///
    /// Returns the handler result and its JSON serialization (the tool output
    /// the backend must echo). Unknown names fail with `UnknownCategory`.
    pub fn invoke(
        &self,
        invocation: &ToolInvocation,
        requester_id: Option<&str>,
    ) -> DeskResult<(HandlerResult, String)> {
        self.invoke_at(invocation, requester_id, chrono::Utc::now())
    }

    pub fn invoke_at(
        &self,
        invocation: &ToolInvocation,
        requester_id: Option<&str>,
        now: Timestamp,
    ) -> DeskResult<(HandlerResult, String)> {
        let def = self.factory.registry().lookup(&invocation.name)?;
        let inputs = arguments_to_inputs(&invocation.arguments);

        let (ticket, message) = self
            .factory
            .build_at(def.category, &inputs, requester_id, now)?;

        tracing::info!(
            ticket_id = %ticket.ticket_id,
            category = %ticket.category,
            priority = %ticket.priority,
            missing = ticket.missing_inputs.len(),
            "Ticket created"
        );

        let result = HandlerResult::created(message, ticket);
        let output = serde_json::to_string(&result)?;
        Ok((result, output))
    }
}

/// Convert tool arguments into factory inputs.
///
/// Strings are taken verbatim, numbers and booleans are stringified, nulls are
/// dropped. Nested values are kept as compact JSON. Anything other than an
/// object yields no inputs.
pub fn arguments_to_inputs(arguments: &Value) -> Inputs {
    let Some(object) = arguments.as_object() else {
        return Inputs::new();
    };

    object
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
