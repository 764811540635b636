//! Settings loaded from environment variables.
//!
//! | Variable                      | Default               | Description                          |
//! |-------------------------------|-----------------------|--------------------------------------|
//! | `QDRANT_URL`                  | (empty)               | Remote Qdrant endpoint; empty = local |
//! | `QDRANT_API_KEY`              | (empty)               | Remote credential                    |
//! | `SKILLGAP_STORAGE_DIR`        | `./qdrant_data`       | Local vector store directory         |
//! | `SKILLGAP_COLLECTION`         | `skills_jobs`         | Collection name                      |
//! | `SKILLGAP_VECTOR_SIZE`        | `384`                 | Vector dimensionality                |
//! | `SKILLGAP_DEADLINES_PATH`     | `data/deadlines.json` | Roadmap deadline file                |
//! | `SKILLGAP_LOG_LEVEL`          | `info`                | tracing filter                       |
//! | `SKILLGAP_EMBEDDING_PROVIDER` | `hashing`             | `hashing` or `openai`                |
//! | `SKILLGAP_EMBEDDING_API_KEY`  | (empty)               | Key for the HTTP embedder            |
//! | `SKILLGAP_EMBEDDING_MODEL`    | provider default      | HTTP embedder model                  |
//! | `SKILLGAP_EMBEDDING_URL`      | `https://api.openai.com` | HTTP embedder base URL            |

use crate::application::vector_db::DEFAULT_COLLECTION;
use crate::domain::entities::collection::DEFAULT_VECTOR_SIZE;
use crate::domain::error::DomainError;
use crate::domain::values::connection_mode::ConnectionMode;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_STORAGE_DIR: &str = "./qdrant_data";
pub const DEFAULT_DEADLINES_PATH: &str = "data/deadlines.json";

#[derive(Clone)]
pub struct Settings {
    pub qdrant_url: String,
    pub qdrant_api_key: String,
    pub storage_dir: PathBuf,
    pub collection: String,
    pub vector_size: usize,
    pub deadlines_path: PathBuf,
    pub log_level: String,
    pub embedding_provider: String,
    pub embedding_api_key: String,
    pub embedding_model: Option<String>,
    pub embedding_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; missing or unparseable values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let str_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            qdrant_url: str_or("QDRANT_URL", ""),
            qdrant_api_key: str_or("QDRANT_API_KEY", ""),
            storage_dir: PathBuf::from(str_or("SKILLGAP_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            collection: str_or("SKILLGAP_COLLECTION", DEFAULT_COLLECTION),
            vector_size: parse_or(lookup("SKILLGAP_VECTOR_SIZE"), DEFAULT_VECTOR_SIZE),
            deadlines_path: PathBuf::from(str_or("SKILLGAP_DEADLINES_PATH", DEFAULT_DEADLINES_PATH)),
            log_level: str_or("SKILLGAP_LOG_LEVEL", "info"),
            embedding_provider: str_or("SKILLGAP_EMBEDDING_PROVIDER", "hashing"),
            embedding_api_key: str_or("SKILLGAP_EMBEDDING_API_KEY", ""),
            embedding_model: non_empty("SKILLGAP_EMBEDDING_MODEL"),
            embedding_url: non_empty("SKILLGAP_EMBEDDING_URL"),
        }
    }

    /// Local-mode defaults rooted at `storage_dir`, deadlines alongside it.
    pub fn local(storage_dir: impl Into<PathBuf>) -> Self {
        let storage_dir = storage_dir.into();
        let mut settings = Self::from_lookup(|_| None);
        settings.deadlines_path = storage_dir.join("deadlines.json");
        settings.storage_dir = storage_dir;
        settings
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.vector_size == 0 {
            return Err(DomainError::Configuration("vector size must be positive".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(DomainError::Configuration("collection name must not be empty".into()));
        }
        Ok(())
    }

    pub fn connection_mode(&self) -> ConnectionMode {
        ConnectionMode::select(&self.qdrant_url, &self.qdrant_api_key, self.storage_dir.clone())
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
