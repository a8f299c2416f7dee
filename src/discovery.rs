//! Finds the first advertised model that actually answers.
//!
//! Candidates are probed strictly in listing order. The first one that
//! answers is written to the output file and the search stops there.

use crate::error::Result;
use crate::llm::gateway::LlmGateway;
use crate::llm::models::{LlmMessage, ModelDescriptor};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed output file, relative to the working directory.
pub const WORKING_MODEL_FILE: &str = "working_model.txt";

/// Minimal probe sent to each candidate.
pub const PROBE_PROMPT: &str = "Hi";

/// Keeps generation-capable models whose name contains one of the patterns.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    patterns: Vec<String>,
}

impl CandidateFilter {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn matches(&self, model: &ModelDescriptor) -> bool {
        model.supports_generation() && self.patterns.iter().any(|p| model.name.contains(p.as_str()))
    }
}

pub struct ModelDiscovery {
    gateway: Arc<dyn LlmGateway>,
    filter: CandidateFilter,
}

impl ModelDiscovery {
    pub fn new(gateway: Arc<dyn LlmGateway>, filter: CandidateFilter) -> Self {
        Self { gateway, filter }
    }

    /// Advertised models that pass the filter, in listing order.
    pub async fn candidates(&self) -> Result<Vec<ModelDescriptor>> {
        let models = self.gateway.get_available_models().await?;
        let total = models.len();

        let candidates: Vec<_> = models.into_iter().filter(|m| self.filter.matches(m)).collect();
        info!(total, candidates = candidates.len(), "Filtered model listing");

        Ok(candidates)
    }

    /// Send the probe prompt to one model. Any accepted call counts, even
    /// one that produced no text.
    pub async fn probe(&self, model: &str) -> Result<()> {
        self.gateway.probe(model, &[LlmMessage::user(PROBE_PROMPT)]).await
    }

    /// Probe candidates until one answers and record it in `output`.
    ///
    /// Returns the recorded name, or `None` when no candidate answered, in
    /// which case `output` is left untouched. Only a failure to list models
    /// or to write the file is an error.
    pub async fn discover(&self, output: &Path) -> Result<Option<String>> {
        for candidate in self.candidates().await? {
            info!(model = %candidate.name, "Testing model");

            match self.probe(&candidate.name).await {
                Ok(()) => {
                    tokio::fs::write(output, candidate.name.as_bytes()).await?;
                    info!(model = %candidate.name, path = %output.display(), "Model responded, recorded");
                    return Ok(Some(candidate.name));
                }
                Err(e) => {
                    warn!(model = %candidate.name, error = %e, "Model probe failed");
                }
            }
        }

        warn!("No candidate model responded");
        Ok(None)
    }
}
