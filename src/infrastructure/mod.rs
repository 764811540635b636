pub mod connection;
pub mod embeddings;
pub mod json;
pub mod qdrant;
pub mod sqlite;
