pub mod deadline_repository;
pub mod embedding_port;
pub mod vector_backend;
