use crate::domain::entities::collection::CollectionConfig;
use crate::domain::entities::record::{Payload, PointId, Record, SearchHit};
use crate::domain::error::DomainError;
use crate::domain::ports::vector_backend::VectorBackend;
use crate::domain::values::connection_mode::ConnectionMode;
use crate::infrastructure::connection::VectorClient;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_COLLECTION: &str = "skills_jobs";
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Typed access to one collection of skill/job embeddings.
///
/// Cheap to share: hold it in an `Arc` and hand it to every consumer. All
/// synchronization is left to the backend.
pub struct VectorDbService {
    backend: Arc<dyn VectorBackend>,
    collection: String,
}

impl VectorDbService {
    pub fn new(backend: Arc<dyn VectorBackend>, collection: impl Into<String>) -> Self {
        Self {
            backend,
            collection: collection.into(),
        }
    }

    pub async fn connect(mode: &ConnectionMode, collection: impl Into<String>) -> Result<Self, DomainError> {
        let client = VectorClient::connect(mode).await?;
        let mode_name = client.mode_name();
        let service = Self::new(Arc::new(client), collection);
        info!(mode = mode_name, collection = %service.collection, "vector store ready");
        Ok(service)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn collections(&self) -> Result<Vec<String>, DomainError> {
        self.backend.list_collections().await
    }

    /// Creates the collection with cosine distance unless it already exists.
    ///
    /// An existing collection is left untouched even if its vector size
    /// differs from `vector_size`; a mismatch shows up on the next upsert.
    /// Returns `true` when the collection was created by this call.
    pub async fn ensure_collection(&self, vector_size: usize) -> Result<bool, DomainError> {
        let existing = self.backend.list_collections().await?;
        if existing.iter().any(|name| name == &self.collection) {
            return Ok(false);
        }
        info!(collection = %self.collection, vector_size, "creating collection");
        self.backend
            .create_collection(&self.collection, &CollectionConfig::cosine(vector_size))
            .await?;
        Ok(true)
    }

    /// Inserts the record or replaces the one with the same id, vector and payload alike.
    pub async fn upsert(&self, id: impl Into<PointId>, vector: Vec<f32>, metadata: Payload) -> Result<(), DomainError> {
        let record = Record::new(id, vector, metadata);
        debug!(collection = %self.collection, id = %record.id, "upsert");
        self.backend.upsert(&self.collection, std::slice::from_ref(&record)).await
    }

    pub async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, DomainError> {
        if limit == 0 {
            return Err(DomainError::InvalidInput("search limit must be positive".into()));
        }
        let hits = self.backend.query(&self.collection, vector, limit).await?;
        debug!(collection = %self.collection, limit, hits = hits.len(), "search");
        Ok(hits)
    }
}
