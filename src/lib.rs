pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::deadline::DeadlineUseCase;
use crate::application::skill_index::SkillIndexUseCase;
use crate::application::vector_db::VectorDbService;
use crate::config::Settings;
use crate::domain::entities::deadline::DeadlineStatus;
use crate::domain::entities::record::{Payload, PointId, SearchHit};
use crate::domain::error::DomainError;
use crate::domain::ports::deadline_repository::DeadlineRepository;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::json::deadline_repo::JsonDeadlineRepo;
use std::sync::Arc;

pub struct SkillGap {
    vectors: Arc<VectorDbService>,
    skills: SkillIndexUseCase,
    deadlines: DeadlineUseCase,
}

impl SkillGap {
    pub async fn new(settings: &Settings) -> Result<Self, DomainError> {
        let embedder: Arc<dyn EmbeddingProvider> = match settings.embedding_provider.as_str() {
            "openai" => Arc::new(OpenAiProvider::new(
                settings.embedding_api_key.clone(),
                settings.embedding_model.clone(),
                settings.embedding_url.clone(),
                settings.vector_size,
            )),
            "hashing" => Arc::new(HashingProvider::new(settings.vector_size)),
            other => {
                return Err(DomainError::Configuration(format!("Unknown embedding provider: {other}")));
            }
        };

        Self::with_providers(settings, embedder).await
    }

    /// Connects the vector store, ensures the collection and opens the deadline file.
    pub async fn with_providers(settings: &Settings, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self, DomainError> {
        settings.validate()?;

        let provider_dim = embedder.dimension();
        if provider_dim != settings.vector_size {
            tracing::warn!(
                provider_dim,
                vector_size = settings.vector_size,
                "embedding provider dimension differs from configured vector size; upserts will be rejected"
            );
        }

        let vectors = Arc::new(VectorDbService::connect(&settings.connection_mode(), settings.collection.clone()).await?);
        vectors.ensure_collection(settings.vector_size).await?;

        let deadline_repo: Arc<dyn DeadlineRepository> = Arc::new(JsonDeadlineRepo::open(&settings.deadlines_path)?);

        Ok(Self {
            skills: SkillIndexUseCase::new(vectors.clone(), embedder),
            deadlines: DeadlineUseCase::new(deadline_repo),
            vectors,
        })
    }

    pub fn vectors(&self) -> Arc<VectorDbService> {
        self.vectors.clone()
    }

    // Delegating methods
    pub async fn index_skill(&self, id: PointId, text: &str, metadata: Payload) -> Result<(), DomainError> {
        self.skills.index(id, text, metadata).await
    }

    pub async fn find_similar(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>, DomainError> {
        self.skills.find_similar(text, limit).await
    }

    pub fn set_deadline(&self, roadmap_id: &str, date: &str) -> Result<DeadlineStatus, DomainError> {
        self.deadlines.set(roadmap_id, date)
    }

    pub fn get_deadline(&self, roadmap_id: &str) -> Result<Option<DeadlineStatus>, DomainError> {
        self.deadlines.get(roadmap_id)
    }

    pub fn delete_deadline(&self, roadmap_id: &str) -> Result<bool, DomainError> {
        self.deadlines.delete(roadmap_id)
    }
}
