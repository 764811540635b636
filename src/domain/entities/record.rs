use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form JSON payload stored alongside a vector.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Caller-assigned record identifier. The store never generates ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Str(String),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{n}"),
            PointId::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for PointId {
    fn from(n: u64) -> Self {
        PointId::Num(n)
    }
}

impl From<String> for PointId {
    fn from(s: String) -> Self {
        PointId::Str(s)
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        PointId::Str(s.to_string())
    }
}

/// One embedded skill or job-description mention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: PointId,
    pub vector: Vec<f32>,
    pub metadata: Payload,
}

impl Record {
    pub fn new(id: impl Into<PointId>, vector: Vec<f32>, metadata: Payload) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata,
        }
    }
}

/// A nearest-neighbour hit. `score` is the engine's cosine similarity, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: PointId,
    pub score: f32,
    pub payload: Payload,
}
