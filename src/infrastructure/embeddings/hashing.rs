use crate::domain::entities::collection::DEFAULT_VECTOR_SIZE;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use sha2::{Digest, Sha256};

/// Offline bag-of-words embedder using signed feature hashing.
///
/// Deterministic across processes and platforms, so vectors written in one
/// run stay comparable with queries issued in the next. Not a semantic model:
/// texts sharing words land close together, synonyms don't.
pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0_f32; self.dimension];
        if self.dimension == 0 {
            return v;
        }
        for token in Self::tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&digest[..8]);
            let idx = (u64::from_le_bytes(bucket) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_VECTOR_SIZE)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
