use anyhow::Context;
use insight_studio::config::StudioConfig;
use insight_studio::server::{self, AppState};
use insight_studio::telemetry::init_tracing;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    init_tracing();

    let config = StudioConfig::from_env().context("Failed to load configuration")?;
    if !dotenv_loaded {
        info!("No .env file found, using process environment only");
    }

    if config.is_api_key_configured() {
        info!(model = %config.model, "API key configured");
    } else {
        warn!(
            "{} is not set; analysis requests will be rejected until it is configured",
            StudioConfig::api_key_var()
        );
    }

    let state = AppState::with_gemini(Arc::new(config)).context("Failed to build Gemini client")?;
    server::serve(state).await.context("Server error")?;

    Ok(())
}
