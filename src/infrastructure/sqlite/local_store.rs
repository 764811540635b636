//! Embedded on-disk vector engine used when no remote endpoint is configured.
//!
//! Layout under the storage directory:
//!
//! - `storage.sqlite` holds collections and points
//! - `.lock` marks the directory as owned by a live process (contains its pid)
//!
//! Like the engine it stands in for, the store refuses to open while `.lock`
//! exists. A crash leaves that file behind; clearing it is the connection
//! manager's job, not the store's. Ownership is also enforced by SQLite's
//! exclusive locking mode, so a second live opener fails even when the
//! marker file has been removed underneath it.

use crate::domain::entities::collection::CollectionConfig;
use crate::domain::entities::record::{Payload, PointId, Record, SearchHit};
use crate::domain::error::DomainError;
use crate::domain::ports::vector_backend::VectorBackend;
use crate::domain::values::distance::Distance;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub const LOCK_FILE_NAME: &str = ".lock";
const DB_FILE_NAME: &str = "storage.sqlite";

pub fn lock_file_path(storage_dir: &Path) -> PathBuf {
    storage_dir.join(LOCK_FILE_NAME)
}

pub struct LocalStore {
    conn: Mutex<Connection>,
    dir: PathBuf,
}

impl LocalStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            DomainError::Connection(format!("Cannot create storage directory {}: {e}", dir.display()))
        })?;

        let lock_path = lock_file_path(&dir);
        if lock_path.exists() {
            return Err(DomainError::Connection(format!(
                "Storage folder {} is already accessed by another instance ({} exists)",
                dir.display(),
                lock_path.display()
            )));
        }

        let db_path = dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)
            .map_err(|e| DomainError::Connection(format!("Cannot open {}: {e}", db_path.display())))?;
        conn.busy_timeout(Duration::ZERO)
            .map_err(|e| DomainError::Connection(format!("busy_timeout error: {e}")))?;
        conn.pragma_update(None, "locking_mode", "EXCLUSIVE")
            .map_err(|e| DomainError::Connection(format!("locking_mode error: {e}")))?;
        run_migrations(&conn).map_err(DomainError::Connection)?;
        // First write takes the exclusive lock, held until the connection closes.
        conn.execute(
            "INSERT OR REPLACE INTO store_meta (key, value) VALUES ('opened_at', ?1)",
            params![Utc::now().to_rfc3339()],
        )
        .map_err(|e| DomainError::Connection(format!("Storage {} is in use: {e}", dir.display())))?;

        std::fs::write(&lock_path, std::process::id().to_string()).map_err(|e| {
            DomainError::Connection(format!("Cannot write {}: {e}", lock_path.display()))
        })?;

        Ok(Self {
            conn: Mutex::new(conn),
            dir,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_config(conn: &Connection, name: &str) -> Result<CollectionConfig, DomainError> {
        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT vector_size, distance FROM collections WHERE name = ?1",
                params![name],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let (size, distance) = row.ok_or_else(|| DomainError::NotFound(format!("Collection `{name}` doesn't exist")))?;
        let distance: Distance = distance.parse().map_err(DomainError::Parse)?;
        Ok(CollectionConfig {
            vector_size: size as usize,
            distance,
        })
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn check_dimension(config: &CollectionConfig, vector: &[f32]) -> Result<(), DomainError> {
        if vector.len() != config.vector_size {
            return Err(DomainError::DimensionMismatch {
                expected: config.vector_size,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    // NaN or infinite components would make scores unorderable.
    fn check_finite(vector: &[f32]) -> Result<(), DomainError> {
        if let Some(pos) = vector.iter().position(|x| !x.is_finite()) {
            return Err(DomainError::InvalidInput(format!(
                "vector component {pos} is not finite ({})",
                vector[pos]
            )));
        }
        Ok(())
    }
}

impl Drop for LocalStore {
    fn drop(&mut self) {
        let lock_path = lock_file_path(&self.dir);
        if let Err(e) = std::fs::remove_file(&lock_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %lock_path.display(), error = %e, "failed to release storage lock");
            }
        }
    }
}

#[async_trait::async_trait]
impl VectorBackend for LocalStore {
    async fn list_collections(&self) -> Result<Vec<String>, DomainError> {
        let conn = self.conn.lock().map_err(|e| DomainError::Store(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT name FROM collections ORDER BY name")
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DomainError::Store(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(names)
    }

    async fn create_collection(&self, name: &str, config: &CollectionConfig) -> Result<(), DomainError> {
        if config.vector_size == 0 {
            return Err(DomainError::InvalidInput("vector size must be positive".into()));
        }
        let conn = self.conn.lock().map_err(|e| DomainError::Store(e.to_string()))?;
        let exists: i64 = conn
            .query_row("SELECT COUNT(*) FROM collections WHERE name = ?1", params![name], |r| r.get(0))
            .map_err(|e| DomainError::Store(e.to_string()))?;
        if exists > 0 {
            return Err(DomainError::Store(format!("Collection `{name}` already exists")));
        }
        conn.execute(
            "INSERT INTO collections (name, vector_size, distance, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, config.vector_size as i64, config.distance.to_string(), Utc::now().to_rfc3339()],
        )
        .map_err(|e| DomainError::Store(format!("Failed to create collection: {e}")))?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: &[Record]) -> Result<(), DomainError> {
        let mut conn = self.conn.lock().map_err(|e| DomainError::Store(e.to_string()))?;
        let config = Self::collection_config(&conn, collection)?;
        for record in records {
            Self::check_dimension(&config, &record.vector)?;
            Self::check_finite(&record.vector)?;
        }

        let tx = conn.transaction().map_err(|e| DomainError::Store(e.to_string()))?;
        let now = Utc::now().to_rfc3339();
        for record in records {
            let id = serde_json::to_string(&record.id).map_err(|e| DomainError::Parse(e.to_string()))?;
            let payload =
                serde_json::to_string(&record.metadata).map_err(|e| DomainError::Parse(e.to_string()))?;
            tx.execute(
                "INSERT OR REPLACE INTO points (collection, id, vector, payload, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![collection, id, Self::serialize_vector(&record.vector), payload, now],
            )
            .map_err(|e| DomainError::Store(format!("Failed to store point: {e}")))?;
        }
        tx.commit().map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(())
    }

    async fn query(&self, collection: &str, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, DomainError> {
        let conn = self.conn.lock().map_err(|e| DomainError::Store(e.to_string()))?;
        let config = Self::collection_config(&conn, collection)?;
        Self::check_dimension(&config, vector)?;
        Self::check_finite(vector)?;

        let mut stmt = conn
            .prepare("SELECT id, vector, payload FROM points WHERE collection = ?1")
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let rows = stmt
            .query_map(params![collection], |row| {
                let id: String = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                let payload: String = row.get(2)?;
                Ok((id, blob, payload))
            })
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let mut hits = Vec::new();
        for row in rows {
            let (id, blob, payload) = row.map_err(|e| DomainError::Store(e.to_string()))?;
            let stored = Self::deserialize_vector(&blob);
            hits.push(SearchHit {
                id: serde_json::from_str::<PointId>(&id).map_err(|e| DomainError::Parse(e.to_string()))?,
                score: config.distance.similarity(vector, &stored),
                payload: serde_json::from_str::<Payload>(&payload).map_err(|e| DomainError::Parse(e.to_string()))?,
            });
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }
}
