//! Turns an uploaded file into the image payload sent to the model.

use crate::error::{Result, StudioError};
use crate::llm::models::ImagePart;
use std::path::Path;

/// File extensions the upload form offers.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

/// A file as received from the upload form.
#[derive(Debug, Clone, Default)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn new(
        file_name: Option<String>,
        content_type: Option<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }

    /// Browsers submit an unnamed, empty part when no file was chosen.
    pub fn is_blank(&self) -> bool {
        self.data.is_empty() && self.file_name.as_deref().map_or(true, str::is_empty)
    }

    /// Declared MIME type, or one guessed from the file name.
    pub fn mime_type(&self) -> String {
        if let Some(declared) = self.content_type.as_deref().filter(|t| !t.is_empty()) {
            return declared.to_string();
        }

        self.file_name
            .as_deref()
            .map(|name| mime_guess::from_path(name).first_or_octet_stream())
            .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM)
            .essence_str()
            .to_string()
    }

    /// Whether the file name carries an allowed extension. Unnamed uploads pass.
    pub fn has_accepted_extension(&self) -> bool {
        match self.file_name.as_deref() {
            None | Some("") => true,
            Some(name) => Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| ACCEPTED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
                .unwrap_or(false),
        }
    }
}

/// Value for an HTML `accept` attribute, e.g. `.jpg,.jpeg,...`.
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

/// Package an upload as a single-element image sequence.
///
/// Fails with [`StudioError::MissingInput`] when nothing was uploaded.
pub fn input_image_setup(upload: Option<UploadedImage>) -> Result<Vec<ImagePart>> {
    match upload.filter(|u| !u.is_blank()) {
        Some(upload) => {
            let mime_type = upload.mime_type();
            Ok(vec![ImagePart::new(mime_type, upload.data)])
        }
        None => Err(StudioError::MissingInput("No file uploaded".to_string())),
    }
}
