//! Connection manager: turns a [`ConnectionMode`] into one live client.
//!
//! Local startup assumes this process owns the storage directory at
//! construction time. Under that assumption any `.lock` already present was
//! left by a process that didn't shut down cleanly, so it is removed before
//! the store opens. If the directory really is in use, the open itself fails.

use crate::domain::entities::collection::CollectionConfig;
use crate::domain::entities::record::{Record, SearchHit};
use crate::domain::error::DomainError;
use crate::domain::ports::vector_backend::VectorBackend;
use crate::domain::values::connection_mode::ConnectionMode;
use crate::infrastructure::qdrant::remote::QdrantRemote;
use crate::infrastructure::sqlite::local_store::{lock_file_path, LocalStore};
use std::path::Path;
use tracing::{info, warn};

pub enum VectorClient {
    Remote(QdrantRemote),
    Local(LocalStore),
}

impl VectorClient {
    pub async fn connect(mode: &ConnectionMode) -> Result<Self, DomainError> {
        match mode {
            ConnectionMode::Remote { url, api_key } => {
                info!(url = %url, "connecting to remote Qdrant");
                let remote = QdrantRemote::connect(url, api_key.clone()).await?;
                Ok(VectorClient::Remote(remote))
            }
            ConnectionMode::Local { path } => {
                clear_stale_lock(path);
                let store = LocalStore::open(path)?;
                info!(path = %store.dir().display(), "initialized local persistent vector storage");
                Ok(VectorClient::Local(store))
            }
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            VectorClient::Remote(_) => "remote",
            VectorClient::Local(_) => "local",
        }
    }

    fn backend(&self) -> &dyn VectorBackend {
        match self {
            VectorClient::Remote(remote) => remote,
            VectorClient::Local(store) => store,
        }
    }
}

/// Removes `<storage_dir>/.lock` if present. Returns whether a file was removed.
///
/// Failure to delete is logged and swallowed; the subsequent open reports the
/// real problem.
pub fn clear_stale_lock(storage_dir: &Path) -> bool {
    let lock_path = lock_file_path(storage_dir);
    if !lock_path.exists() {
        return false;
    }
    info!(path = %lock_path.display(), "removing stale storage lock file");
    match std::fs::remove_file(&lock_path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %lock_path.display(), error = %e, "failed to remove lock file");
            false
        }
    }
}

#[async_trait::async_trait]
impl VectorBackend for VectorClient {
    async fn list_collections(&self) -> Result<Vec<String>, DomainError> {
        self.backend().list_collections().await
    }

    async fn create_collection(&self, name: &str, config: &CollectionConfig) -> Result<(), DomainError> {
        self.backend().create_collection(name, config).await
    }

    async fn upsert(&self, collection: &str, records: &[Record]) -> Result<(), DomainError> {
        self.backend().upsert(collection, records).await
    }

    async fn query(&self, collection: &str, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, DomainError> {
        self.backend().query(collection, vector, limit).await
    }
}
