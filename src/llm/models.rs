use serde::{Deserialize, Serialize};

/// Generation method a model must advertise to be usable for text completion.
pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// Message role in a generative conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
}

/// Raw image bytes tagged with their declared MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePart {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// One ordered piece of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image(ImagePart),
}

/// Message in a generative conversation
#[derive(Debug, Clone)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub parts: Vec<ContentPart>,
}

impl LlmMessage {
    /// Create a user message holding a single text part
    pub fn user(content: impl Into<String>) -> Self {
        Self::user_parts(vec![ContentPart::Text(content.into())])
    }

    /// Create a user message from already ordered parts
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: MessageRole::User,
            parts,
        }
    }
}

/// Response from LLM gateway
#[derive(Debug, Clone, Default)]
pub struct LlmGatewayResponse {
    pub content: Option<String>,
    pub finish_reason: Option<String>,
}

/// A model advertised by the provider's listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Capability flag: whether the model supports content generation
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods.iter().any(|m| m == GENERATE_CONTENT_METHOD)
    }
}
