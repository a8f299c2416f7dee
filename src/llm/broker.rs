use crate::error::Result;
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::LlmMessage;
use std::sync::Arc;
use tracing::debug;

/// Binds a model name to a gateway and hands back plain text
#[derive(Clone)]
pub struct LlmBroker {
    model: String,
    gateway: Arc<dyn LlmGateway>,
}

impl LlmBroker {
    /// Create a new LLM broker
    pub fn new(model: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text response from the model
    pub async fn generate(
        &self,
        messages: &[LlmMessage],
        config: Option<CompletionConfig>,
    ) -> Result<String> {
        let config = config.unwrap_or_default();

        let response = self.gateway.complete(&self.model, messages, &config).await?;

        if let Some(reason) = &response.finish_reason {
            debug!(model = %self.model, finish_reason = %reason, "Completion finished");
        }

        Ok(response.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StudioError;
    use crate::llm::models::{LlmGatewayResponse, ModelDescriptor};
    use std::sync::Mutex;

    // Mock gateway for testing
    struct MockGateway {
        response: std::result::Result<LlmGatewayResponse, String>,
        seen_models: Mutex<Vec<String>>,
    }

    impl MockGateway {
        fn new(response: std::result::Result<LlmGatewayResponse, String>) -> Self {
            Self {
                response,
                seen_models: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(
            &self,
            model: &str,
            _messages: &[LlmMessage],
            _config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            self.seen_models.lock().unwrap().push(model.to_string());
            self.response.clone().map_err(StudioError::ApiError)
        }

        async fn get_available_models(&self) -> Result<Vec<ModelDescriptor>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_generate_returns_content() {
        let gateway = Arc::new(MockGateway::new(Ok(LlmGatewayResponse {
            content: Some("A steel truss bridge.".to_string()),
            finish_reason: Some("STOP".to_string()),
        })));
        let broker = LlmBroker::new("gemini-2.5-flash", gateway.clone());

        let text = broker.generate(&[LlmMessage::user("Hi")], None).await.unwrap();

        assert_eq!(text, "A steel truss bridge.");
        assert_eq!(*gateway.seen_models.lock().unwrap(), vec!["gemini-2.5-flash"]);
    }

    #[tokio::test]
    async fn test_generate_missing_content_is_empty_string() {
        let gateway = Arc::new(MockGateway::new(Ok(LlmGatewayResponse::default())));
        let broker = LlmBroker::new("m", gateway);

        let text = broker.generate(&[LlmMessage::user("Hi")], None).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_generate_propagates_gateway_error() {
        let gateway = Arc::new(MockGateway::new(Err("quota".to_string())));
        let broker = LlmBroker::new("m", gateway);

        let result = broker.generate(&[LlmMessage::user("Hi")], None).await;
        assert!(matches!(result, Err(StudioError::ApiError(msg)) if msg == "quota"));
    }

    #[test]
    fn test_model_accessor() {
        let gateway = Arc::new(MockGateway::new(Ok(LlmGatewayResponse::default())));
        let broker = LlmBroker::new("models/gemini-1.5-pro", gateway);
        assert_eq!(broker.model(), "models/gemini-1.5-pro");
    }
}
