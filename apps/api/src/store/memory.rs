use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::resume::{NewResume, ResumeRecord};
use crate::store::{ResumeStore, StoreError};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    resumes: Vec<ResumeRecord>,
    last_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store with ready-made records, keeping their ids.
    #[cfg(test)]
    pub fn with_records(records: Vec<ResumeRecord>) -> Self {
        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            inner: RwLock::new(Inner {
                resumes: records,
                last_id,
            }),
        }
    }
}

#[async_trait]
impl ResumeStore for InMemoryStore {
    async fn append(&self, resume: NewResume) -> Result<ResumeRecord, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let record = resume.into_record(inner.last_id, Utc::now());
        inner.resumes.push(record.clone());
        Ok(record)
    }

    async fn read_all(&self) -> Result<Vec<ResumeRecord>, StoreError> {
        Ok(self.inner.read().await.resumes.clone())
    }

    async fn get(&self, id: i64) -> Result<Option<ResumeRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .resumes
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
