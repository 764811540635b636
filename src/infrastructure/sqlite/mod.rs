pub mod local_store;
pub mod migrations;
