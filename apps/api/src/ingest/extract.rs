//! Text extraction for uploaded resume files.
//!
//! Only the boundary lives here: pick a reader by file kind and hand back a
//! string. PDF parsing is delegated entirely to `pdf-extract`.

use thiserror::Error;
use tracing::debug;

/// Extensions that are never read as text, whatever MIME type the client claims.
const BINARY_DOCUMENT_EXTENSIONS: &[&str] = &[".doc", ".docx", ".odt", ".rtf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Classifies an upload by MIME type or file extension, PDF first.
    /// Word-processor files are unsupported even when sent as `text/plain`.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        let name = file_name.to_lowercase();
        let mime = content_type.map(|m| m.trim().to_lowercase());
        let mime = mime.as_deref();

        if BINARY_DOCUMENT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            None
        } else if mime == Some("application/pdf") || name.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if mime.is_some_and(|m| m.starts_with("text/plain")) || name.ends_with(".txt") {
            Some(DocumentKind::PlainText)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type. Use PDF or TXT.")]
    UnsupportedType,

    #[error("Could not extract text from file.")]
    EmptyText,

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Extraction worker failed: {0}")]
    Worker(tokio::task::JoinError),
}

/// Extracts the raw text of an uploaded file. The returned text is never blank.
pub async fn extract_text(
    file_name: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<String, ExtractError> {
    let kind = DocumentKind::detect(file_name, content_type).ok_or(ExtractError::UnsupportedType)?;

    let text = match kind {
        DocumentKind::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
        DocumentKind::Pdf => extract_pdf(bytes).await?,
    };

    debug!("Extracted {} chars from {file_name} ({kind:?})", text.chars().count());

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyText);
    }
    Ok(text)
}

async fn extract_pdf(bytes: Vec<u8>) -> Result<String, ExtractError> {
    // CPU-bound and prone to panicking on malformed input; keep it off the async workers.
    let joined = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await;

    match joined {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(msg)) => Err(ExtractError::Pdf(msg)),
        Err(e) if e.is_panic() => Err(ExtractError::Pdf("PDF parser aborted".to_string())),
        Err(e) => Err(ExtractError::Worker(e)),
    }
}
