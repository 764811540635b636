//! Shared test helpers.
#![allow(dead_code)]

use serde_json::Value;
use skillgap::application::vector_db::{VectorDbService, DEFAULT_COLLECTION};
use skillgap::domain::entities::record::Payload;
use skillgap::domain::values::connection_mode::ConnectionMode;
use std::path::Path;

pub async fn local_service(dir: &Path) -> VectorDbService {
    VectorDbService::connect(&ConnectionMode::local(dir), DEFAULT_COLLECTION)
        .await
        .unwrap()
}

/// `dim`-sized vector with 1.0 at `hot` and a small shared component elsewhere.
pub fn spike(dim: usize, hot: usize) -> Vec<f32> {
    let mut v = vec![0.01_f32; dim];
    v[hot] = 1.0;
    v
}

pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("payload must be a JSON object, got {other}"),
    }
}
