//! Resume persistence behind a single trait.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`; the backend is chosen at startup
//! from `STORE_BACKEND`. Ranking only ever sees the snapshot returned by `read_all`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, StoreBackend};
use crate::models::resume::{NewResume, ResumeRecord};

pub mod json_file;
pub mod memory;
pub mod postgres;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use postgres::PgResumeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Assigns the next id and creation time, persists, and returns the stored record.
    async fn append(&self, resume: NewResume) -> Result<ResumeRecord, StoreError>;

    /// Every record in insertion order.
    async fn read_all(&self) -> Result<Vec<ResumeRecord>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<ResumeRecord>, StoreError>;

    fn backend(&self) -> &'static str;
}

/// Builds the store selected in config, creating files or tables as needed.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn ResumeStore>> {
    let store: Arc<dyn ResumeStore> = match config.store_backend {
        StoreBackend::Json => {
            Arc::new(JsonFileStore::open(config.data_dir.join(json_file::FILE_NAME)).await?)
        }
        StoreBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL must be set when STORE_BACKEND=postgres")
            })?;
            Arc::new(PgResumeStore::connect(url).await?)
        }
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
    };
    Ok(store)
}
