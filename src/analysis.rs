//! One structural analysis: instruction, image, prompt in; tagged outcome out.

use crate::llm::broker::LlmBroker;
use crate::llm::models::{ContentPart, ImagePart, LlmMessage};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_INSTRUCTION: &str = "Analyze the following image:";

pub const DEFAULT_PROMPT: &str = "Analyze this civil engineering structure image. Provide a detailed breakdown including: type of structure, materials used, estimated dimensions, construction method, notable features, and any engineering challenges visible.";

pub const REPORT_FILE_NAME: &str = "structural_analysis_report.md";
pub const REPORT_MIME_TYPE: &str = "text/markdown";

/// Ordered inputs for a single analysis call.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub instruction: String,
    pub images: Vec<ImagePart>,
    pub prompt: String,
}

impl AnalysisRequest {
    pub fn new(images: Vec<ImagePart>, prompt: impl Into<String>) -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            images,
            prompt: prompt.into(),
        }
    }

    /// Instruction first, then every image, then the prompt.
    pub fn to_message(&self) -> LlmMessage {
        let mut parts = Vec::with_capacity(self.images.len() + 2);
        parts.push(ContentPart::Text(self.instruction.clone()));
        parts.extend(self.images.iter().cloned().map(ContentPart::Image));
        parts.push(ContentPart::Text(self.prompt.clone()));
        LlmMessage::user_parts(parts)
    }
}

/// Result of an analysis, kept apart from legitimate model text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Success { text: String },
    Failure { message: String },
}

impl AnalysisOutcome {
    /// The downloadable report body; only successful analyses produce one.
    pub fn report(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }
}

/// Sends analysis requests to a model and never lets a failure escape.
#[derive(Clone)]
pub struct Analyzer {
    broker: LlmBroker,
}

impl Analyzer {
    pub fn new(broker: LlmBroker) -> Self {
        Self { broker }
    }

    pub fn model(&self) -> &str {
        self.broker.model()
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        info!(
            model = %self.broker.model(),
            images = request.images.len(),
            prompt_chars = request.prompt.chars().count(),
            "Requesting structural analysis"
        );

        match self.broker.generate(&[request.to_message()], None).await {
            Ok(text) => AnalysisOutcome::Success { text },
            Err(e) => {
                warn!(model = %self.broker.model(), error = %e, "Analysis request failed");
                AnalysisOutcome::Failure {
                    message: format!("Error generating content: {}", e),
                }
            }
        }
    }
}
