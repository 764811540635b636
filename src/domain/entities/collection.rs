use crate::domain::values::distance::Distance;
use serde::{Deserialize, Serialize};

/// Default dimensionality, matching the all-MiniLM-L6-v2 embedding model.
pub const DEFAULT_VECTOR_SIZE: usize = 384;

/// Parameters a collection is created with. Immutable once the collection exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub vector_size: usize,
    pub distance: Distance,
}

impl CollectionConfig {
    pub fn cosine(vector_size: usize) -> Self {
        Self {
            vector_size,
            distance: Distance::Cosine,
        }
    }
}

