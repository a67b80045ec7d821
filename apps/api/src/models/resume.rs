use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A persisted resume. `embedding` holds the encoded vector exactly as stored;
/// decoding happens at query time so a bad row can degrade instead of failing.
///
/// Deserialization also accepts older camel-cased documents:
/// string ids and a camel-cased `fileName`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[sqlx(rename = "raw_text")]
    pub text: String,
    pub embedding: String,
    #[serde(alias = "fileName", default)]
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid resume id {s:?}"))),
    }
}

/// Everything a store needs to append a resume; id and timestamp are assigned on append.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub name: String,
    pub email: String,
    pub text: String,
    pub embedding: String,
    pub file_name: String,
}

impl NewResume {
    pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> ResumeRecord {
        ResumeRecord {
            id,
            name: self.name,
            email: self.email,
            text: self.text,
            embedding: self.embedding,
            file_name: self.file_name,
            created_at,
        }
    }
}

/// Public view of a stored resume (the encoded embedding stays internal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeView {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeRecord> for ResumeView {
    fn from(r: ResumeRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            file_name: r.file_name,
            text: r.text,
            created_at: r.created_at,
        }
    }
}

/// Display fields copied onto every search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub name: String,
    pub email: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub snippet: String,
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn snippet(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
