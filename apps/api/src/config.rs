use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::matching::embedder::DEFAULT_DIM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Json,
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Ok(StoreBackend::Json),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("Unknown STORE_BACKEND '{other}' (expected json, postgres or memory)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Everything has a default except `DATABASE_URL`, which the postgres backend requires.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub store_backend: StoreBackend,
    pub data_dir: PathBuf,
    pub database_url: Option<String>,
    pub embedding_dim: usize,
    pub default_top_k: usize,
    pub max_upload_bytes: usize,
    pub parallel_rank_threshold: usize,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            rust_log: "info".to_string(),
            store_backend: StoreBackend::Json,
            data_dir: PathBuf::from("data"),
            database_url: None,
            embedding_dim: DEFAULT_DIM,
            default_top_k: 5,
            max_upload_bytes: 15 * 1024 * 1024,
            parallel_rank_threshold: 512,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let config = Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            store_backend: parse_env("STORE_BACKEND", defaults.store_backend)?,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            database_url: std::env::var("DATABASE_URL").ok(),
            embedding_dim: parse_env("EMBEDDING_DIM", defaults.embedding_dim)?,
            default_top_k: parse_env("DEFAULT_TOP_K", defaults.default_top_k)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            parallel_rank_threshold: parse_env(
                "PARALLEL_RANK_THRESHOLD",
                defaults.parallel_rank_threshold,
            )?,
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            bail!("EMBEDDING_DIM must be greater than zero");
        }
        if self.store_backend == StoreBackend::Postgres && self.database_url.is_none() {
            bail!("Required environment variable 'DATABASE_URL' is not set (STORE_BACKEND=postgres)");
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
