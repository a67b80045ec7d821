//! Single-document JSON store.
//!
//! File layout: `{ "resumes": [ResumeRecord, ...], "last_id": n }`, pretty-printed.
//! Every append rewrites the whole document: temp file -> fsync -> rename.
//! Older camel-cased documents (`lastId`, string ids, `fileName`) load as is
//! and are rewritten in this layout on the next append.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::resume::{NewResume, ResumeRecord};
use crate::store::{ResumeStore, StoreError};

pub const FILE_NAME: &str = "resumes.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    resumes: Vec<ResumeRecord>,
    #[serde(alias = "lastId", default)]
    last_id: i64,
}

pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store at `path`, creating the parent directory and an empty
    /// document if needed. An existing file that does not parse is an error.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };

        match fs::metadata(&store.path).await {
            Ok(_) => {
                let doc = store.load().await?;
                info!(
                    "Opened resume store {} ({} records)",
                    store.path().display(),
                    doc.resumes.len()
                );
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                store.save(&Document::default()).await?;
                info!("Created empty resume store at {}", store.path.display());
            }
            Err(e) => return Err(io_error(&store.path, e)),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => return Err(io_error(&self.path, e)),
        };

        let mut doc: Document =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })?;

        // A stale counter must never hand out an id that is already taken.
        let max_id = doc.resumes.iter().map(|r| r.id).max().unwrap_or(0);
        doc.last_id = doc.last_id.max(max_id);
        Ok(doc)
    }

    async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        let temp_path = self.path.with_extension("json.tmp");

        if let Err(e) = write_synced(&temp_path, &bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(&temp_path, e));
        }

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| io_error(&self.path, e))
    }
}

#[async_trait]
impl ResumeStore for JsonFileStore {
    async fn append(&self, resume: NewResume) -> Result<ResumeRecord, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut doc = self.load().await?;
        doc.last_id += 1;
        let record = resume.into_record(doc.last_id, Utc::now());
        doc.resumes.push(record.clone());
        self.save(&doc).await?;

        debug!("Appended resume {} to {}", record.id, self.path.display());
        Ok(record)
    }

    async fn read_all(&self) -> Result<Vec<ResumeRecord>, StoreError> {
        Ok(self.load().await?.resumes)
    }

    async fn get(&self, id: i64) -> Result<Option<ResumeRecord>, StoreError> {
        Ok(self.load().await?.resumes.into_iter().find(|r| r.id == id))
    }

    fn backend(&self) -> &'static str {
        "json"
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

fn io_error(path: &Path, source: io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
