use crate::error::Result;
use crate::llm::models::{LlmGatewayResponse, LlmMessage, ModelDescriptor};
use async_trait::async_trait;

/// Optional sampling settings; unset fields are left to the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub max_output_tokens: Option<u32>,
}

impl CompletionConfig {
    /// True when every field is unset
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Abstract interface for generative model providers
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Complete a request and return the generated text
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse>;

    /// List every model the provider advertises, in listing order
    async fn get_available_models(&self) -> Result<Vec<ModelDescriptor>>;

    /// Check that `model` accepts a request at all.
    ///
    /// Succeeds whenever the call itself succeeds, whether or not any text
    /// came back.
    async fn probe(&self, model: &str, messages: &[LlmMessage]) -> Result<()> {
        self.complete(model, messages, &CompletionConfig::default()).await?;
        Ok(())
    }
}
