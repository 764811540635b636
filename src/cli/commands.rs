use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "skillgap", about = "Skill and job-description vector index with roadmap deadlines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to the configured store and create the collection if missing
    Init,
    /// Embed a text and upsert it under an id
    Index {
        /// Record id (unsigned integer or string)
        id: String,
        /// Text to embed
        text: String,
        /// JSON object stored as the record payload
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Nearest-neighbour search by text
    Search {
        text: String,
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Set or move a roadmap deadline
    DeadlineSet {
        roadmap_id: String,
        /// Date in YYYY-MM-DD
        date: String,
    },
    /// Show a roadmap deadline with days remaining
    DeadlineGet { roadmap_id: String },
    /// Remove a roadmap deadline
    DeadlineDelete { roadmap_id: String },
}
