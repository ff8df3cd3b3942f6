//! SQLite schema and connection setup (§6: nodes/edges/scans).

use rusqlite::Connection;

use gen_d_core::errors::StoreError;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS scans (
    scan_id       TEXT PRIMARY KEY,
    timestamp     TIMESTAMP NOT NULL,
    directory     TEXT NOT NULL,
    files_scanned INTEGER NOT NULL,
    nodes_found   INTEGER NOT NULL,
    errors        INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS nodes (
    node_id      TEXT PRIMARY KEY,
    file_path    TEXT NOT NULL,
    start_line   INTEGER NOT NULL,
    end_line     INTEGER NOT NULL,
    semantic_hash TEXT NOT NULL,
    doc_hash     TEXT NULL,
    last_scanned TIMESTAMP NOT NULL,
    scan_id      TEXT NULL REFERENCES scans(scan_id)
);

CREATE TABLE IF NOT EXISTS edges (
    caller_id TEXT NOT NULL,
    callee_id TEXT NOT NULL,
    call_line INTEGER NULL,
    PRIMARY KEY (caller_id, callee_id)
);

CREATE INDEX IF NOT EXISTS idx_nodes_file_path ON nodes(file_path);
CREATE INDEX IF NOT EXISTS idx_nodes_scan_id ON nodes(scan_id);
CREATE INDEX IF NOT EXISTS idx_edges_caller_id ON edges(caller_id);
CREATE INDEX IF NOT EXISTS idx_edges_callee_id ON edges(callee_id);
";

/// Open (creating if absent) the database at `path` and bring its schema up
/// to date.
pub fn open_and_initialize(path: &std::path::Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StoreError::Io { path: parent.display().to_string(), source: e })?;
    }
    let conn = Connection::open(path)
        .map_err(|e| StoreError::Backend(format!("failed to open database: {e}")))?;
    apply_pragmas(&conn)?;
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| StoreError::Backend(format!("failed to initialize schema: {e}")))?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| StoreError::Backend(format!("pragma journal_mode: {e}")))?;
    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(|e| StoreError::Backend(format!("pragma synchronous: {e}")))?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| StoreError::Backend(format!("pragma foreign_keys: {e}")))?;
    conn.pragma_update(None, "busy_timeout", 5000)
        .map_err(|e| StoreError::Backend(format!("pragma busy_timeout: {e}")))?;
    conn.pragma_update(None, "cache_size", -8000)
        .map_err(|e| StoreError::Backend(format!("pragma cache_size: {e}")))?;
    conn.pragma_update(None, "mmap_size", 268_435_456_i64)
        .map_err(|e| StoreError::Backend(format!("pragma mmap_size: {e}")))?;
    conn.pragma_update(None, "temp_store", "MEMORY")
        .map_err(|e| StoreError::Backend(format!("pragma temp_store: {e}")))?;
    conn.pragma_update(None, "auto_vacuum", "INCREMENTAL")
        .map_err(|e| StoreError::Backend(format!("pragma auto_vacuum: {e}")))?;
    Ok(())
}

/// Returns the set of table names present, for schema-sanity tests.
pub fn table_names(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let mut names = Vec::new();
    for r in rows {
        names.push(r.map_err(|e| StoreError::Backend(e.to_string()))?);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_expected_tables() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_and_initialize(&dir.path().join("gen-d.db")).unwrap();
        let names = table_names(&conn).unwrap();
        assert!(names.contains(&"nodes".to_string()));
        assert!(names.contains(&"edges".to_string()));
        assert!(names.contains(&"scans".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen-d.db");
        open_and_initialize(&path).unwrap();
        let conn = open_and_initialize(&path).unwrap();
        assert!(table_names(&conn).unwrap().len() >= 3);
    }
}
