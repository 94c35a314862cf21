//! OpenAI generation backend

use super::client::OpenAIClient;
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, FunctionCall, FunctionDefinition,
    ToolCall, ToolDefinition,
};
use crate::providers::invalid_response;
use crate::{BackendReply, GenerationBackend, GenerationRequest};
use async_trait::async_trait;
use deskroute_core::{BackendConfig, DeskResult, Role, ToolInvocation};
use serde_json::Value;
use std::time::Duration;

/// OpenAI-compatible backend using chat completions with tools.
#[derive(Debug)]
pub struct OpenAIBackend {
    client: OpenAIClient,
    model: String,
    temperature: f32,
}

impl OpenAIBackend {
    pub fn new(client: OpenAIClient, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }

    pub fn from_config(config: &BackendConfig) -> DeskResult<Self> {
        let client = OpenAIClient::new(
            config.api_key.clone(),
            config.base_url.as_deref(),
            Duration::from_secs(config.timeout_secs),
            config.requests_per_minute,
        )?;
        Ok(Self::new(client, config.model.clone(), config.temperature))
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    fn provider_id(&self) -> &str {
        "openai"
    }

    async fn respond(&self, request: &GenerationRequest) -> DeskResult<BackendReply> {
        let body = build_request(request, &self.model, self.temperature);
        let response: ChatCompletionResponse =
            self.client.request("chat/completions", &body).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "OpenAI usage"
            );
        }

        parse_reply(response)
    }
}

/// Translate a generation request into a chat completion body.
///
/// Each scratchpad entry becomes an assistant `tool_calls` message followed
/// by the matching `tool` message.
pub(crate) fn build_request(
    request: &GenerationRequest,
    model: &str,
    temperature: f32,
) -> ChatCompletionRequest {
    let mut messages = vec![ChatMessage::text("system", request.system_instructions.clone())];

    messages.extend(request.transcript().into_iter().map(|turn| {
        let role = match turn.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        ChatMessage::text(role, turn.content)
    }));

    for exchange in &request.scratchpad {
        let invocation = &exchange.invocation;
        messages.push(ChatMessage {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: invocation.call_id.clone(),
                r#type: "function".to_string(),
                function: FunctionCall {
                    name: invocation.name.clone(),
                    arguments: invocation.arguments.to_string(),
                },
            }]),
            tool_call_id: None,
        });
        messages.push(ChatMessage {
            role: "tool".to_string(),
            content: Some(exchange.output.clone()),
            tool_calls: None,
            tool_call_id: Some(invocation.call_id.clone()),
        });
    }

    let tools = request
        .tools
        .iter()
        .map(|spec| ToolDefinition {
            r#type: "function".to_string(),
            function: FunctionDefinition {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        })
        .collect();

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        tools,
        temperature: Some(temperature),
    }
}

/// Interpret the first choice as tool calls or final text.
pub(crate) fn parse_reply(response: ChatCompletionResponse) -> DeskResult<BackendReply> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| invalid_response("openai", "No completion in response"))?;

    let tool_calls = message.tool_calls.unwrap_or_default();
    if !tool_calls.is_empty() {
        let calls = tool_calls
            .into_iter()
            .map(|call| {
                let arguments = if call.function.arguments.trim().is_empty() {
                    Value::Object(Default::default())
                } else {
                    serde_json::from_str(&call.function.arguments).map_err(|e| {
                        invalid_response(
                            "openai",
                            format!("Malformed arguments for {}: {}", call.function.name, e),
                        )
                    })?
                };
                Ok(ToolInvocation {
                    call_id: call.id,
                    name: call.function.name,
                    arguments,
                })
            })
            .collect::<DeskResult<Vec<_>>>()?;
        return Ok(BackendReply::ToolCalls(calls));
    }

    match message.content {
        Some(text) if !text.trim().is_empty() => Ok(BackendReply::Text(text)),
        _ => Err(invalid_response("openai", "Empty completion content")),
    }
}

// =============================================================================
// TESTS
// =============================================================================
