pub mod deadline;
pub mod skill_index;
pub mod vector_db;
