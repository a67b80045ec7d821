use tracing::{debug, info};

use crate::errors::AppError;
use crate::matching::embedder::Embedder;
use crate::matching::vector::encode_embedding;
use crate::models::resume::{NewResume, ResumeRecord};
use crate::store::ResumeStore;

pub const DEFAULT_NAME: &str = "Unknown Candidate";
pub const DEFAULT_EMAIL: &str = "No Email";

/// A resume whose text has already been extracted.
#[derive(Debug, Clone)]
pub struct ExtractedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub file_name: String,
    pub text: String,
}

/// Embeds the resume text and appends the record to the store.
pub async fn ingest_resume(
    store: &dyn ResumeStore,
    embedder: &dyn Embedder,
    dim: usize,
    resume: ExtractedResume,
) -> Result<ResumeRecord, AppError> {
    let embedding = embedder.embed(&resume.text, dim);
    debug!(
        "Embedded {} chars into {} dims (norm {:.6})",
        resume.text.len(),
        embedding.dim(),
        embedding.norm()
    );

    let record = store
        .append(NewResume {
            name: non_blank_or(resume.name, DEFAULT_NAME),
            email: non_blank_or(resume.email, DEFAULT_EMAIL),
            text: resume.text,
            embedding: encode_embedding(&embedding),
            file_name: resume.file_name,
        })
        .await?;

    info!(
        "Stored resume {} ({}, {} chars)",
        record.id,
        record.file_name,
        record.text.chars().count()
    );
    Ok(record)
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
