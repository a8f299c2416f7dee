use crate::analysis::{DEFAULT_PROMPT, REPORT_FILE_NAME};
use crate::config::StudioConfig;
use crate::ingest::accept_attribute;
use askama::Template;

/// Upload page: key status, form, preview and the rendered report.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub key_class: &'static str,
    pub key_status: String,
    pub accept: String,
    pub default_prompt: &'static str,
    pub report_file: &'static str,
    pub model: String,
}

impl IndexTemplate {
    pub fn new(config: &StudioConfig) -> Self {
        let (key_class, key_status) = if config.is_api_key_configured() {
            ("ok", "API Key Configured".to_string())
        } else {
            (
                "missing",
                format!("API Key Missing: please add {} to your .env file.", StudioConfig::api_key_var()),
            )
        };

        Self {
            key_class,
            key_status,
            accept: accept_attribute(),
            default_prompt: DEFAULT_PROMPT,
            report_file: REPORT_FILE_NAME,
            model: config.model.clone(),
        }
    }
}

/// Render the upload page for the current configuration.
pub fn render_index(config: &StudioConfig) -> askama::Result<String> {
    IndexTemplate::new(config).render()
}
