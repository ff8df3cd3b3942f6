//! `SqliteSnapshotStore`: the SQLite-backed implementation of
//! `gen_d_core::types::SnapshotStore` (§4.6). Connection-and-transaction
//! handling follows the three-table schema in §6.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use gen_d_core::errors::StoreError;
use gen_d_core::types::{CallableId, CallableRecord, ScanRecord, Snapshot, SnapshotStore};

use crate::lock::WorkspaceLock;
use crate::schema;

/// A snapshot store backed by a single SQLite file, guarded by an advisory
/// workspace lock (§5: multiple readers, one writer).
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteSnapshotStore {
    /// Open (creating if absent) the store at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = schema::open_and_initialize(db_path)?;
        Ok(Self { conn: Mutex::new(conn), db_path: db_path.to_path_buf() })
    }

    fn lock_dir(&self) -> Result<WorkspaceLock, StoreError> {
        let dir = self.db_path.parent().unwrap_or_else(|| Path::new("."));
        WorkspaceLock::new(dir)
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn put_many(&self, records: &[CallableRecord], scan_id: &str) -> Result<(), StoreError> {
        let mut lock = self.lock_dir()?;
        let _guard = lock.write()?;

        let mut conn = self.conn.lock().map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
        let tx = conn.transaction().map_err(|e| StoreError::Backend(e.to_string()))?;
        let now: DateTime<Utc> = Utc::now();
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO nodes (node_id, file_path, start_line, end_line, semantic_hash, doc_hash, last_scanned, scan_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(node_id) DO UPDATE SET
                         file_path = excluded.file_path,
                         start_line = excluded.start_line,
                         end_line = excluded.end_line,
                         semantic_hash = excluded.semantic_hash,
                         doc_hash = excluded.doc_hash,
                         last_scanned = excluded.last_scanned,
                         scan_id = excluded.scan_id",
                )
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            for r in records {
                stmt.execute(params![
                    r.id,
                    r.file_path,
                    r.start_line,
                    r.end_line,
                    r.semantic_fingerprint,
                    r.doc_fingerprint,
                    now.to_rfc3339(),
                    scan_id,
                ])
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let mut lock = self.lock_dir()?;
        let _guard = lock.read()?;
        let conn = self.conn.lock().map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
        conn.query_row(
            "SELECT node_id, file_path, start_line, end_line, semantic_hash, doc_hash, last_scanned FROM nodes WHERE node_id = ?1",
            params![id],
            row_to_snapshot,
        )
        .optional()
        .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn get_all(&self) -> Result<BTreeMap<CallableId, Snapshot>, StoreError> {
        let mut lock = self.lock_dir()?;
        let _guard = lock.read()?;
        let conn = self.conn.lock().map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
        let mut stmt = conn
            .prepare("SELECT node_id, file_path, start_line, end_line, semantic_hash, doc_hash, last_scanned FROM nodes")
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let rows = stmt.query_map([], row_to_snapshot).map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut out = BTreeMap::new();
        for row in rows {
            let snap = row.map_err(|e| StoreError::Backend(e.to_string()))?;
            out.insert(snap.callable_id.clone(), snap);
        }
        Ok(out)
    }

    fn delete_by_file(&self, file_path: &str) -> Result<u64, StoreError> {
        let mut lock = self.lock_dir()?;
        let _guard = lock.write()?;
        let conn = self.conn.lock().map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
        let n = conn
            .execute("DELETE FROM nodes WHERE file_path = ?1", params![file_path])
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(n as u64)
    }

    fn put_edges(&self, edges: &[(CallableId, CallableId, u32)]) -> Result<(), StoreError> {
        let mut lock = self.lock_dir()?;
        let _guard = lock.write()?;

        let mut conn = self.conn.lock().map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
        let tx = conn.transaction().map_err(|e| StoreError::Backend(e.to_string()))?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO edges (caller_id, callee_id, call_line)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(caller_id, callee_id) DO UPDATE SET
                         call_line = excluded.call_line",
                )
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            for (caller_id, callee_id, call_line) in edges {
                stmt.execute(params![caller_id, callee_id, call_line])
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn record_scan(&self, root: &str, files: u32, callables: u32, errors: u32) -> Result<String, StoreError> {
        let mut lock = self.lock_dir()?;
        let _guard = lock.write()?;
        let conn = self.conn.lock().map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
        let scan_id = Uuid::new_v4().to_string();
        let now: DateTime<Utc> = Utc::now();
        conn.execute(
            "INSERT INTO scans (scan_id, timestamp, directory, files_scanned, nodes_found, errors)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![scan_id, now.to_rfc3339(), root, files, callables, errors],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(scan_id)
    }

    fn scan_history(&self, limit: u32) -> Result<Vec<ScanRecord>, StoreError> {
        let mut lock = self.lock_dir()?;
        let _guard = lock.read()?;
        let conn = self.conn.lock().map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT scan_id, timestamp, directory, files_scanned, nodes_found, errors
                 FROM scans ORDER BY timestamp DESC LIMIT ?1",
            )
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let rows = stmt
            .query_map(params![limit], |row| {
                let ts: String = row.get(1)?;
                Ok(ScanRecord {
                    scan_id: row.get(0)?,
                    timestamp: parse_rfc3339(&ts),
                    root_directory: row.get(2)?,
                    files_count: row.get(3)?,
                    callables_count: row.get(4)?,
                    parse_error_count: row.get(5)?,
                })
            })
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| StoreError::Backend(e.to_string()))?);
        }
        Ok(out)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut lock = self.lock_dir()?;
        let _guard = lock.write()?;
        let conn = self.conn.lock().map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
        conn.execute_batch("DELETE FROM nodes; DELETE FROM edges; DELETE FROM scans;")
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

fn row_to_snapshot(row: &rusqlite::Row) -> rusqlite::Result<Snapshot> {
    let last_scanned: String = row.get(6)?;
    Ok(Snapshot {
        callable_id: row.get(0)?,
        file_path: row.get(1)?,
        start_line: row.get(2)?,
        end_line: row.get(3)?,
        semantic_fingerprint: row.get(4)?,
        doc_fingerprint: row.get(5)?,
        recorded_at: parse_rfc3339(&last_scanned),
    })
}

fn parse_rfc3339(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)).unwrap_or_else(|_| Utc::now())
}
