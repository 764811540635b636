pub mod connection_mode;
pub mod distance;
