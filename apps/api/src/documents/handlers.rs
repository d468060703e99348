use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::documents::export::{download_file_name, render, ExportFormat};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub resume_text: String,
    pub file_name: Option<String>,
}

/// POST /api/v1/download/:format
///
/// Renders the edited resume as `pdf`, `docx`, `rtf` or `txt` and returns it as an attachment.
pub async fn handle_download(
    Path(format): Path<String>,
    Json(req): Json<DownloadRequest>,
) -> Result<Response, AppError> {
    let format = ExportFormat::from_extension(&format).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported download format '{format}' (expected pdf, docx, rtf or txt)"
        ))
    })?;
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text is required".to_string()));
    }

    let body = render(&req.resume_text, format)?;
    let file_name = download_file_name(req.file_name.as_deref(), format);
    info!(
        format = format.extension(),
        file_name = %file_name,
        size = body.len(),
        "Resume export rendered"
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
