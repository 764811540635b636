use crate::domain::entities::collection::CollectionConfig;
use crate::domain::entities::record::{Payload, PointId, Record, SearchHit};
use crate::domain::error::DomainError;
use crate::domain::ports::vector_backend::VectorBackend;
use crate::domain::values::distance::Distance;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload key carrying a string id that Qdrant can't take as a point id.
pub const ORIGINAL_ID_KEY: &str = "__skillgap_id";

/// Qdrant REST client (managed cluster or self-hosted).
pub struct QdrantRemote {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct QdrantErrorBody {
    status: QdrantErrorStatus,
}

#[derive(Deserialize)]
struct QdrantErrorStatus {
    error: String,
}

#[derive(Deserialize)]
struct CollectionsList {
    collections: Vec<CollectionDescription>,
}

#[derive(Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: Distance,
}

#[derive(Serialize)]
struct UpsertRequest {
    points: Vec<PointStruct>,
}

#[derive(Serialize)]
struct PointStruct {
    id: Value,
    vector: Vec<f32>,
    payload: Payload,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    points: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    id: PointId,
    score: f32,
    #[serde(default)]
    payload: Option<Payload>,
}

impl QdrantRemote {
    /// Builds the client and probes the endpoint so a bad URL or credential
    /// fails here rather than on first use.
    pub async fn connect(url: &str, api_key: Option<String>) -> Result<Self, DomainError> {
        let base_url = Url::parse(url).map_err(|e| DomainError::Connection(format!("Invalid Qdrant URL {url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::Connection(format!("Invalid Qdrant URL {url}")));
        }
        let client = Client::builder()
            .build()
            .map_err(|e| DomainError::Connection(format!("HTTP client error: {e}")))?;

        let remote = Self {
            client,
            base_url,
            api_key,
        };
        remote
            .list_collections()
            .await
            .map_err(|e| DomainError::Connection(format!("Qdrant at {url} is unreachable: {e}")))?;
        Ok(remote)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::Store(format!("Invalid Qdrant URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, DomainError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| DomainError::Store(format!("Qdrant request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(error_from_response(status.as_u16(), &body));
        }

        let parsed: QdrantResponse<T> = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Qdrant response: {e}")))?;
        Ok(parsed.result)
    }
}

#[async_trait::async_trait]
impl VectorBackend for QdrantRemote {
    async fn list_collections(&self) -> Result<Vec<String>, DomainError> {
        let url = self.endpoint(&["collections"])?;
        let list: CollectionsList = self.send(self.request(Method::GET, url)).await?;
        Ok(list.collections.into_iter().map(|c| c.name).collect())
    }

    async fn create_collection(&self, name: &str, config: &CollectionConfig) -> Result<(), DomainError> {
        let url = self.endpoint(&["collections", name])?;
        let body = CreateCollectionRequest {
            vectors: VectorParams {
                size: config.vector_size,
                distance: config.distance,
            },
        };
        let _: IgnoredAny = self.send(self.request(Method::PUT, url).json(&body)).await?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: &[Record]) -> Result<(), DomainError> {
        let mut url = self.endpoint(&["collections", collection, "points"])?;
        url.query_pairs_mut().append_pair("wait", "true");
        let body = UpsertRequest {
            points: records.iter().map(to_point).collect(),
        };
        let _: IgnoredAny = self.send(self.request(Method::PUT, url).json(&body)).await?;
        Ok(())
    }

    async fn query(&self, collection: &str, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, DomainError> {
        let url = self.endpoint(&["collections", collection, "points", "query"])?;
        let body = QueryRequest {
            query: vector,
            limit,
            with_payload: true,
        };
        let resp: QueryResponse = self.send(self.request(Method::POST, url).json(&body)).await?;
        Ok(resp.points.into_iter().map(to_hit).collect())
    }
}

/// Qdrant ids are unsigned integers or UUIDs. Any other string, including a
/// UUID not in canonical lowercase hyphenated form, maps to a stable UUIDv5
/// and the original rides along in the payload.
fn to_point(record: &Record) -> PointStruct {
    let mut payload = record.metadata.clone();
    // Reserved for the id mapping; a caller-supplied value would hijack the returned id.
    payload.remove(ORIGINAL_ID_KEY);
    let id = match &record.id {
        PointId::Num(n) => Value::from(*n),
        PointId::Str(s) if is_canonical_uuid(s) => Value::from(s.clone()),
        PointId::Str(s) => {
            payload.insert(ORIGINAL_ID_KEY.to_string(), Value::from(s.clone()));
            Value::from(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, s.as_bytes()).to_string())
        }
    };
    PointStruct {
        id,
        vector: record.vector.clone(),
        payload,
    }
}

fn is_canonical_uuid(s: &str) -> bool {
    uuid::Uuid::parse_str(s)
        .map(|u| u.hyphenated().to_string() == s)
        .unwrap_or(false)
}

fn to_hit(point: ScoredPoint) -> SearchHit {
    let mut payload = point.payload.unwrap_or_default();
    let id = match payload.remove(ORIGINAL_ID_KEY) {
        Some(Value::String(original)) => PointId::Str(original),
        Some(other) => {
            payload.insert(ORIGINAL_ID_KEY.to_string(), other);
            point.id
        }
        None => point.id,
    };
    SearchHit {
        id,
        score: point.score,
        payload,
    }
}

fn error_from_response(status: u16, body: &str) -> DomainError {
    let message = serde_json::from_str::<QdrantErrorBody>(body)
        .map(|b| b.status.error)
        .unwrap_or_else(|_| body.to_string());

    if let Some((expected, actual)) = parse_dimension_error(&message) {
        return DomainError::DimensionMismatch { expected, actual };
    }
    if status == 404 {
        return DomainError::NotFound(message);
    }
    DomainError::Store(format!("Qdrant {status}: {message}"))
}

/// Pulls the sizes out of "Vector dimension error: expected dim: 384, got 128".
fn parse_dimension_error(message: &str) -> Option<(usize, usize)> {
    fn leading_number(s: &str) -> Option<usize> {
        let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    let rest = &message[message.find("expected dim: ")? + "expected dim: ".len()..];
    let expected = leading_number(rest)?;
    let rest = &rest[rest.find("got ")? + "got ".len()..];
    let actual = leading_number(rest)?;
    Some((expected, actual))
}
