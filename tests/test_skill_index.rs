mod common;

use common::payload;
use serde_json::json;
use skillgap::config::Settings;
use skillgap::domain::entities::record::PointId;
use skillgap::domain::error::DomainError;
use skillgap::domain::ports::embedding_port::EmbeddingProvider;
use skillgap::infrastructure::embeddings::hashing::HashingProvider;
use skillgap::SkillGap;
use std::sync::Arc;
use tempfile::TempDir;

struct EmptyProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for EmptyProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|_| vec![]).collect())
    }

    fn dimension(&self) -> usize {
        0
    }
}

async fn setup(dir: &TempDir) -> SkillGap {
    SkillGap::new(&Settings::local(dir.path())).await.unwrap()
}

#[tokio::test]
async fn test_startup_creates_collection() {
    let dir = TempDir::new().unwrap();
    let sg = setup(&dir).await;
    let names = sg.vectors().collections().await.unwrap();
    assert_eq!(names, vec!["skills_jobs".to_string()]);
}

#[tokio::test]
async fn test_index_and_find_similar() {
    let dir = TempDir::new().unwrap();
    let sg = setup(&dir).await;

    sg.index_skill("skill:python".into(), "Python programming", payload(json!({"name": "Python"})))
        .await
        .unwrap();
    sg.index_skill("skill:sql".into(), "SQL databases and query tuning", payload(json!({"name": "SQL"})))
        .await
        .unwrap();
    sg.index_skill(
        "job:backend".into(),
        "Backend engineer: Python services, SQL databases",
        payload(json!({"role": "Backend Engineer", "category": "job"})),
    )
    .await
    .unwrap();

    let hits = sg.find_similar("Python programming", 1).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, PointId::from("skill:python"));
    assert!((hits[0].score - 1.0).abs() < 1e-4);

    let hits = sg.find_similar("SQL databases", 3).await.unwrap();
    assert_eq!(hits.len(), 3);
    assert_ne!(hits[0].id, PointId::from("skill:python"));
}

#[tokio::test]
async fn test_reopen_keeps_index() {
    let dir = TempDir::new().unwrap();
    {
        let sg = setup(&dir).await;
        sg.index_skill(PointId::Num(17), "Kubernetes operations", payload(json!({"name": "Kubernetes"})))
            .await
            .unwrap();
    }
    let sg = setup(&dir).await;
    let hits = sg.find_similar("Kubernetes operations", 5).await.unwrap();
    assert_eq!(hits[0].id, PointId::Num(17));
}

#[tokio::test]
async fn test_empty_embedding_is_an_error() {
    let dir = TempDir::new().unwrap();
    let sg = SkillGap::with_providers(&Settings::local(dir.path()), Arc::new(EmptyProvider))
        .await
        .unwrap();
    let err = sg.index_skill("x".into(), "anything", payload(json!({}))).await.unwrap_err();
    assert!(matches!(err, DomainError::Embedding(_)));
}

#[tokio::test]
async fn test_embedder_size_mismatch_surfaces_on_upsert() {
    let dir = TempDir::new().unwrap();
    let sg = SkillGap::with_providers(&Settings::local(dir.path()), Arc::new(HashingProvider::new(128)))
        .await
        .unwrap();
    let err = sg.index_skill("x".into(), "Go concurrency", payload(json!({}))).await.unwrap_err();
    assert!(matches!(err, DomainError::DimensionMismatch { expected: 384, actual: 128 }));
}

#[tokio::test]
async fn test_unknown_provider_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::local(dir.path());
    settings.embedding_provider = "word2vec".into();
    let err = SkillGap::new(&settings).await.err().unwrap();
    assert!(matches!(err, DomainError::Configuration(_)));
}
