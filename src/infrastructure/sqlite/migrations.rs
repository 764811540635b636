use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS store_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS collections (
            name TEXT PRIMARY KEY,
            vector_size INTEGER NOT NULL,
            distance TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS points (
            collection TEXT NOT NULL REFERENCES collections(name),
            id TEXT NOT NULL,
            vector BLOB NOT NULL,
            payload TEXT NOT NULL DEFAULT '{}',
            updated_at TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_points_collection ON points(collection);
        "
    ).map_err(|e| format!("Migration failed: {e}"))
}
