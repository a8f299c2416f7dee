//! Gemini gateway for multimodal content generation.
//!
//! Talks to the `generativelanguage` REST API: `models/{model}:generateContent`
//! for completions and the paginated `models` listing for discovery.

use crate::config::StudioConfig;
use crate::error::{Result, StudioError};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::gateways::gemini_messages_adapter::{
    build_request, extract_text, GeminiErrorEnvelope, GenerateContentResponse, ListModelsResponse,
};
use crate::llm::models::{LlmGatewayResponse, LlmMessage, ModelDescriptor};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};

const API_KEY_HEADER: &str = "x-goog-api-key";
const LIST_PAGE_SIZE: u32 = 1000;

/// Configuration for connecting to the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<std::time::Duration>,
}

impl From<&StudioConfig> for GeminiConfig {
    fn from(config: &StudioConfig) -> Self {
        Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        }
    }
}

/// Gateway for Google's hosted Gemini models.
pub struct GeminiGateway {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGateway {
    /// Create a gateway from explicit configuration.
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(Self { client, config })
    }

    /// Create a gateway with an API key against a custom base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(GeminiConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: None,
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.config.base_url, model_path(model))
    }

    async fn send_generate(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<Response> {
        let body = build_request(messages, config);

        let response = self
            .client
            .post(self.generate_url(model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        check_status(response).await
    }

    async fn list_models_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse> {
        let mut query = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .query(&query)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json::<ListModelsResponse>().await?)
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to Gemini for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let response = self.send_generate(model, messages, config).await?;
        let response_body: GenerateContentResponse = response.json().await?;
        let (content, finish_reason) = extract_text(&response_body)?;

        Ok(LlmGatewayResponse {
            content: Some(content),
            finish_reason,
        })
    }

    async fn get_available_models(&self) -> Result<Vec<ModelDescriptor>> {
        debug!("Fetching available Gemini models");

        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_models_page(page_token.as_deref()).await?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = models.len(), "Fetched Gemini model listing");
        Ok(models)
    }

    async fn probe(&self, model: &str, messages: &[LlmMessage]) -> Result<()> {
        debug!(model, "Probing Gemini model");
        self.send_generate(model, messages, &CompletionConfig::default()).await?;
        Ok(())
    }
}

/// Model names from the listing carry a `models/` prefix; bare names do not.
pub fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    Err(map_error_status(status, &body))
}

fn map_error_status(status: StatusCode, body: &str) -> StudioError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        400 => StudioError::ApiError(format!("Bad request: {}", message)),
        401 | 403 => StudioError::AuthenticationError(message),
        429 => StudioError::ApiError(format!("Quota exceeded: {}", message)),
        _ => StudioError::ApiError(format!("HTTP {}: {}", status, message)),
    }
}
