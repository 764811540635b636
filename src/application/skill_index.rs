use crate::application::vector_db::VectorDbService;
use crate::domain::entities::record::{Payload, PointId, SearchHit};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use std::sync::Arc;

pub struct SkillIndexUseCase {
    vectors: Arc<VectorDbService>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SkillIndexUseCase {
    pub fn new(vectors: Arc<VectorDbService>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { vectors, embedder }
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let vectors = self.embedder.embed(&[text.to_string()]).await?;
        vectors
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DomainError::Embedding(format!("no embedding produced for {text:?}")))
    }

    /// Embeds `text` and stores it under `id`.
    pub async fn index(&self, id: PointId, text: &str, metadata: Payload) -> Result<(), DomainError> {
        let vector = self.embed_one(text).await?;
        self.vectors.upsert(id, vector, metadata).await
    }

    pub async fn find_similar(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>, DomainError> {
        let vector = self.embed_one(text).await?;
        self.vectors.search(&vector, limit).await
    }
}
