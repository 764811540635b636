use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Any OpenAI-compatible `/v1/embeddings` endpoint.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
}

#[derive(Serialize)]
struct OpenAiRequest {
    input: Vec<String>,
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Deserialize)]
struct OpenAiEmbedding {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>, dimension: usize) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| "text-embedding-3-small".to_string()),
            base_url: base_url
                .unwrap_or_else(|| "https://api.openai.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            dimension,
        }
    }

    /// Only the text-embedding-3 family accepts a `dimensions` override; older
    /// models and most compatible servers reject the field.
    fn request(&self, texts: &[String]) -> OpenAiRequest {
        let dimensions = self.model.starts_with("text-embedding-3").then_some(self.dimension);
        OpenAiRequest {
            input: texts.to_vec(),
            model: self.model.clone(),
            dimensions,
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request(texts))
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("OpenAI API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!("OpenAI API {status}: {body}")));
        }

        let mut result: OpenAiResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Parse error: {e}")))?;
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(model: Option<&str>) -> serde_json::Value {
        let provider = OpenAiProvider::new("k".into(), model.map(String::from), None, 384);
        serde_json::to_value(provider.request(&["Rust".to_string()])).unwrap()
    }

    #[test]
    fn test_dimensions_sent_for_v3_models() {
        let json = body(None);
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["dimensions"], 384);
    }

    #[test]
    fn test_dimensions_omitted_for_other_models() {
        for model in ["text-embedding-ada-002", "nomic-embed-text"] {
            let json = body(Some(model));
            assert_eq!(json, json!({"input": ["Rust"], "model": model}));
        }
    }
}
