use crate::domain::entities::collection::CollectionConfig;
use crate::domain::entities::record::{Record, SearchHit};
use crate::domain::error::DomainError;

/// The similarity-search engine as this crate sees it.
///
/// Implementations must be safe to share across tasks; any synchronization
/// lives inside the engine.
#[async_trait::async_trait]
pub trait VectorBackend: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<String>, DomainError>;

    async fn create_collection(&self, name: &str, config: &CollectionConfig) -> Result<(), DomainError>;

    /// Insert or wholly replace each record by id.
    async fn upsert(&self, collection: &str, records: &[Record]) -> Result<(), DomainError>;

    /// At most `limit` hits, best first.
    async fn query(&self, collection: &str, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, DomainError>;
}
