//! Wire types for the Gemini REST API and the adapter from [`LlmMessage`].

use crate::error::{Result, StudioError};
use crate::llm::gateway::CompletionConfig;
use crate::llm::models::{ContentPart, LlmMessage, MessageRole, ModelDescriptor};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeminiContent {
    pub role: MessageRole,
    pub parts: Vec<GeminiPart>,
}

/// Serializes as `{"text": ...}` or `{"inlineData": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GeminiPart {
    Text(String),
    InlineData(GeminiInlineData),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiCandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidateContent {
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

/// Response parts may carry non-text payloads; only text is read.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
    pub next_page_token: Option<String>,
}

/// `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorEnvelope {
    pub error: GeminiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorBody {
    pub message: String,
}

/// Convert messages into Gemini contents, base64-encoding image bytes.
pub fn adapt_messages_to_gemini(messages: &[LlmMessage]) -> Vec<GeminiContent> {
    messages
        .iter()
        .map(|msg| GeminiContent {
            role: msg.role,
            parts: msg
                .parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text(text) => GeminiPart::Text(text.clone()),
                    ContentPart::Image(image) => GeminiPart::InlineData(GeminiInlineData {
                        mime_type: image.mime_type.clone(),
                        data: base64::engine::general_purpose::STANDARD.encode(&image.data),
                    }),
                })
                .collect(),
        })
        .collect()
}

/// Build the request body, omitting `generationConfig` when nothing is set.
pub fn build_request(messages: &[LlmMessage], config: &CompletionConfig) -> GenerateContentRequest {
    let generation_config = if config.is_empty() {
        None
    } else {
        Some(GeminiGenerationConfig {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        })
    };

    GenerateContentRequest {
        contents: adapt_messages_to_gemini(messages),
        generation_config,
    }
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(response: &GenerateContentResponse) -> Result<(String, Option<String>)> {
    let candidate = match response.candidates.first() {
        Some(candidate) => candidate,
        None => {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
                .unwrap_or("no candidates returned");
            return Err(StudioError::GatewayError(format!("Response blocked: {}", reason)));
        }
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.is_empty() {
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(StudioError::GatewayError(format!(
            "Response contained no text (finish reason: {})",
            reason
        )));
    }

    Ok((text, candidate.finish_reason.clone()))
}
