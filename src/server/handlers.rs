use crate::analysis::{AnalysisOutcome, AnalysisRequest, REPORT_FILE_NAME, REPORT_MIME_TYPE};
use crate::ingest::{input_image_setup, UploadedImage, ACCEPTED_EXTENSIONS};
use crate::server::error::ApiError;
use crate::server::page::render_index;
use crate::server::AppState;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fields collected from the analysis form
#[derive(Debug, Default)]
struct AnalysisForm {
    image: Option<UploadedImage>,
    prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub api_key_configured: bool,
    pub model: String,
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    Ok(Html(render_index(&state.config)?))
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        api_key_configured: state.config.is_api_key_configured(),
        model: state.analyzer.model().to_string(),
    })
}

/// Run one analysis and render the tagged outcome as JSON.
///
/// Remote failures come back as `200` with `"status": "failure"`; only
/// problems with the form itself produce an error status.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let outcome = run_analysis(&state, multipart).await?;
    Ok(Json(outcome))
}

/// Run one analysis and return the result as a Markdown attachment.
pub async fn analyze_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let outcome = run_analysis(&state, multipart).await?;

    let response = match outcome.report() {
        Some(text) => (
            [
                (header::CONTENT_TYPE, format!("{}; charset=utf-8", REPORT_MIME_TYPE)),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
                ),
            ],
            text.to_string(),
        )
            .into_response(),
        None => (StatusCode::BAD_GATEWAY, Json(outcome)).into_response(),
    };

    Ok(response)
}

async fn run_analysis(state: &AppState, multipart: Multipart) -> Result<AnalysisOutcome, ApiError> {
    if !state.config.is_api_key_configured() {
        return Err(ApiError::NotConfigured {
            message: "Please configure your API key first.".to_string(),
        });
    }

    let form = read_form(multipart).await?;

    if let Some(upload) = form.image.as_ref().filter(|u| !u.is_blank()) {
        if !upload.has_accepted_extension() {
            return Err(ApiError::UnsupportedMediaType {
                message: format!(
                    "Unsupported file type '{}'. Supported formats: {}",
                    upload.file_name.as_deref().unwrap_or_default(),
                    ACCEPTED_EXTENSIONS.join(", ")
                ),
            });
        }
    }

    let images = input_image_setup(form.image)?;

    let prompt = form.prompt.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(ApiError::BadRequest {
            message: "Please enter a prompt.".to_string(),
        });
    }

    let request = AnalysisRequest::new(images, prompt);
    Ok(state.analyzer.analyze(&request).await)
}

async fn read_form(mut multipart: Multipart) -> Result<AnalysisForm, ApiError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;

                debug!(file_name = ?file_name, size = data.len(), "Received upload");
                form.image = Some(UploadedImage::new(file_name, content_type, data.to_vec()));
            }
            "prompt" => {
                form.prompt = Some(field.text().await?);
            }
            other => {
                debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}
