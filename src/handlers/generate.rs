use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::error::{PagesmithError, Result};
use crate::form::PromptForm;
use crate::handlers::MULTIPART_OVERHEAD;
use crate::service::PagesmithService;

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub html: String,
}

/// POST /api/generate with multipart fields `prompt` and `file`
pub async fn generate(
    State(service): State<PagesmithService>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>> {
    let mut multipart = multipart
        .map_err(|e| PagesmithError::validation("form", e.body_text()))?;
    let limit = service.max_upload_bytes();
    let body_limit = limit + MULTIPART_OVERHEAD;

    let mut form = PromptForm::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, body_limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, body_limit))?;
                form.set_prompt(text);
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, body_limit))?;
                // Browsers send an empty part when no file was chosen
                if bytes.is_empty() {
                    continue;
                }
                let attachment =
                    Attachment::new(file_name, content_type.as_deref(), bytes.to_vec(), limit)?;
                form.drop_file(attachment);
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let html = service.submit(&mut form).await?;
    Ok(Json(GenerateResponse { html }))
}

fn multipart_error(e: MultipartError, body_limit: usize) -> PagesmithError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PagesmithError::BodyTooLarge { limit: body_limit }
    } else {
        PagesmithError::validation("form", e.body_text())
    }
}
