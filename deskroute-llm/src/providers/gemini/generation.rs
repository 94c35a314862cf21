//! Gemini generation backend

use super::client::GeminiClient;
use super::types::{
    Content, FunctionCall, FunctionDeclaration, FunctionResponse, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part, Tool,
};
use crate::providers::invalid_response;
use crate::{BackendReply, GenerationBackend, GenerationRequest};
use async_trait::async_trait;
use deskroute_core::{BackendConfig, DeskResult, Role, ToolInvocation};
use serde_json::{json, Value};
use std::time::Duration;

/// Gemini backend with function calling.
#[derive(Debug)]
pub struct GeminiBackend {
    client: GeminiClient,
    model: String,
    temperature: f32,
}

impl GeminiBackend {
    pub fn new(client: GeminiClient, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }

    pub fn from_config(config: &BackendConfig) -> DeskResult<Self> {
        let client = GeminiClient::new(
            config.api_key.clone(),
            config.base_url.as_deref(),
            Duration::from_secs(config.timeout_secs),
            config.requests_per_minute,
        )?;
        Ok(Self::new(client, config.model.clone(), config.temperature))
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    async fn respond(&self, request: &GenerationRequest) -> DeskResult<BackendReply> {
        let body = build_request(request, self.temperature);
        let response = self.client.generate_content(&self.model, &body).await?;

        if let Some(usage) = &response.usage_metadata {
            tracing::debug!(
                prompt_tokens = ?usage.prompt_token_count,
                response_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini usage"
            );
        }

        parse_reply(response)
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Translate a generation request into a `generateContent` body.
///
/// The scratchpad is replayed after the current user turn as alternating
/// `functionCall` / `functionResponse` contents.
pub(crate) fn build_request(request: &GenerationRequest, temperature: f32) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .transcript()
        .into_iter()
        .map(|turn| Content::text(Some(role_name(turn.role)), turn.content))
        .collect();

    for exchange in &request.scratchpad {
        contents.push(Content {
            role: Some("model".to_string()),
            parts: vec![Part {
                function_call: Some(FunctionCall {
                    name: exchange.invocation.name.clone(),
                    args: exchange.invocation.arguments.clone(),
                }),
                ..Part::default()
            }],
        });

        let response = match exchange.output_value() {
            object @ Value::Object(_) => object,
            other => json!({ "content": other }),
        };
        contents.push(Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                function_response: Some(FunctionResponse {
                    name: exchange.invocation.name.clone(),
                    response,
                }),
                ..Part::default()
            }],
        });
    }

    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![Tool {
            function_declarations: request
                .tools
                .iter()
                .map(|spec| FunctionDeclaration {
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    parameters: spec.parameters.clone(),
                })
                .collect(),
        }]
    };

    GenerateContentRequest {
        system_instruction: Some(Content::text(None, request.system_instructions.clone())),
        contents,
        tools,
        generation_config: Some(GenerationConfig {
            temperature: Some(temperature),
        }),
    }
}

/// Interpret the first candidate as tool calls or final text.
pub(crate) fn parse_reply(response: GenerateContentResponse) -> DeskResult<BackendReply> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| invalid_response("gemini", "No candidates in response"))?;

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty() {
        return Err(invalid_response(
            "gemini",
            format!(
                "No content in candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ),
        ));
    }

    let calls: Vec<ToolInvocation> = parts
        .iter()
        .filter_map(|part| part.function_call.as_ref())
        .enumerate()
        .map(|(index, call)| ToolInvocation {
            call_id: format!("{}-{}", call.name, index),
            name: call.name.clone(),
            arguments: call.args.clone(),
        })
        .collect();

    if !calls.is_empty() {
        return Ok(BackendReply::ToolCalls(calls));
    }

    let text: String = parts.iter().filter_map(|part| part.text.as_deref()).collect();
    if text.trim().is_empty() {
        return Err(invalid_response("gemini", "Empty text in candidate"));
    }
    Ok(BackendReply::Text(text))
}

// =============================================================================
// TESTS
// =============================================================================
