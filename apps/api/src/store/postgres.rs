use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{create_pool, ensure_schema};
use crate::models::resume::{NewResume, ResumeRecord};
use crate::store::{ResumeStore, StoreError};

/// Postgres-backed store. Ids come from the `BIGSERIAL` sequence, so they are
/// unique and increasing but may skip values after a failed insert.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = create_pool(database_url).await?;
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn append(&self, resume: NewResume) -> Result<ResumeRecord, StoreError> {
        let record = sqlx::query_as::<_, ResumeRecord>(
            r#"
            INSERT INTO resumes (name, email, raw_text, embedding, file_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, raw_text, embedding, file_name, created_at
            "#,
        )
        .bind(&resume.name)
        .bind(&resume.email)
        .bind(&resume.text)
        .bind(&resume.embedding)
        .bind(&resume.file_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn read_all(&self) -> Result<Vec<ResumeRecord>, StoreError> {
        let records = sqlx::query_as::<_, ResumeRecord>(
            "SELECT id, name, email, raw_text, embedding, file_name, created_at FROM resumes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn get(&self, id: i64) -> Result<Option<ResumeRecord>, StoreError> {
        let record = sqlx::query_as::<_, ResumeRecord>(
            "SELECT id, name, email, raw_text, embedding, file_name, created_at FROM resumes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
