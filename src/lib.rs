//! Civil Engineering Insight Studio.
//!
//! Sends a photo of a civil structure plus a prompt to a hosted Gemini model
//! and returns the analysis, and finds a model that currently answers.

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod server;
pub mod telemetry;

pub use error::{Result, StudioError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{AnalysisOutcome, AnalysisRequest, Analyzer};
    pub use crate::config::StudioConfig;
    pub use crate::discovery::{CandidateFilter, ModelDiscovery};
    pub use crate::error::{Result, StudioError};
    pub use crate::llm::gateways::GeminiGateway;
    pub use crate::llm::{CompletionConfig, LlmBroker, LlmGateway, LlmMessage};
}
