use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Similarity metric of a collection. Serialized the way Qdrant spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Distance {
    #[default]
    Cosine,
}

impl Distance {
    /// Similarity between two vectors, higher is closer.
    ///
    /// Mismatched lengths and zero vectors score 0.0.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Distance::Cosine => cosine_similarity(a, b),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom) as f32
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Cosine => write!(f, "Cosine"),
        }
    }
}

impl FromStr for Distance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(Distance::Cosine),
            _ => Err(format!("Unknown distance: {s}")),
        }
    }
}
