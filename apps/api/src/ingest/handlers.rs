//! Axum route handlers for resume upload and lookup.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::ingest::extract::extract_text;
use crate::ingest::service::{ingest_resume, ExtractedResume};
use crate::models::resume::{snippet, ResumeView};
use crate::state::AppState;

const UPLOAD_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub id: i64,
    pub snippet: String,
}

struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// POST /api/upload
///
/// Multipart form with `name`, `email` and `file`. Extracts text, embeds it and
/// stores the resume.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let limit = state.config.max_upload_bytes;
    let read_error = |e: MultipartError| multipart_error(e, limit);

    let mut name = None;
    let mut email = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => name = Some(field.text().await.map_err(read_error)?),
            Some("email") => email = Some(field.text().await.map_err(read_error)?),
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(read_error)?.to_vec();
                // Browsers send an empty part when no file was chosen.
                if !(file_name.is_empty() && bytes.is_empty()) {
                    file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("File is required".to_string()))?;
    let text = extract_text(&file.file_name, file.content_type.as_deref(), file.bytes).await?;

    let record = ingest_resume(
        state.store.as_ref(),
        state.embedder.as_ref(),
        state.config.embedding_dim,
        ExtractedResume {
            name,
            email,
            file_name: file.file_name,
            text,
        },
    )
    .await?;

    Ok(Json(UploadResponse {
        success: true,
        id: record.id,
        snippet: snippet(&record.text, UPLOAD_SNIPPET_CHARS).to_string(),
    }))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ResumeView>, AppError> {
    let record = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    Ok(Json(record.into()))
}

fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Upload exceeds the {limit}-byte limit ({})",
            e.body_text()
        ))
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}
