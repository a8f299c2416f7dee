//! Probe the Gemini model listing and record the first model that answers.
//!
//! Writes the model name to `working_model.txt` in the current directory.
//! Nothing is written when no candidate responds.

use anyhow::Context;
use insight_studio::config::StudioConfig;
use insight_studio::discovery::{CandidateFilter, ModelDiscovery, WORKING_MODEL_FILE};
use insight_studio::llm::gateways::{GeminiConfig, GeminiGateway};
use insight_studio::telemetry::init_tracing;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = StudioConfig::from_env().context("Failed to load configuration")?;
    if !config.is_api_key_configured() {
        error!("{} is not set; cannot query the model listing", StudioConfig::api_key_var());
        return Ok(());
    }

    let gateway = GeminiGateway::with_config(GeminiConfig::from(&config))
        .context("Failed to build Gemini client")?;
    let filter = CandidateFilter::new(config.probe_patterns.clone());
    let discovery = ModelDiscovery::new(Arc::new(gateway), filter);

    info!(patterns = ?config.probe_patterns, "Searching for working model...");

    match discovery.discover(Path::new(WORKING_MODEL_FILE)).await {
        Ok(Some(model)) => println!("SUCCESS: {}", model),
        Ok(None) => info!("No working model found; {} not written", WORKING_MODEL_FILE),
        Err(e) => error!("Global error: {}", e),
    }

    Ok(())
}
