//! The data model (§3): `CallableRecord`, `CallSite`, `Snapshot`,
//! `ScanRecord`, `DriftReport`, and the `SnapshotStore` trait contract (§4.6).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// A stable identifier: `"<file-path>:<qualified-name>"` (§3, Identifier contract).
pub type CallableId = String;

/// Build an identifier from a file path and a dotted qualified name.
pub fn make_id(file_path: &str, qualified_name: &str) -> CallableId {
    format!("{file_path}:{qualified_name}")
}

/// Build a dotted qualified name from optional module, class stack, callable
/// stack (outer to inner), and the callable's own simple name (§3, §4.1).
pub fn make_qualified_name(
    module: Option<&str>,
    class_stack: &[String],
    callable_stack: &[String],
    simple_name: &str,
) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(m) = module {
        parts.push(m);
    }
    for c in class_stack {
        parts.push(c);
    }
    for c in callable_stack {
        parts.push(c);
    }
    parts.push(simple_name);
    parts.join(".")
}

/// Classification of documentation drift for a callable (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftStatus {
    Fresh,
    Stale,
    Undocumented,
}

impl DriftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftStatus::Fresh => "fresh",
            DriftStatus::Stale => "stale",
            DriftStatus::Undocumented => "undocumented",
        }
    }
}

/// A function, method, or nested function discovered during extraction (§3).
///
/// Immutable once constructed except for `drift_status`, which the
/// classifier produces as a derived copy (§3, Lifecycle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableRecord {
    pub id: CallableId,
    pub name: String,
    pub file_path: String,
    pub class_name: Option<String>,
    pub is_method: bool,
    pub start_line: u32,
    pub end_line: u32,
    pub semantic_fingerprint: String,
    pub doc_fingerprint: Option<String>,
    pub docstring: Option<String>,
    pub drift_status: DriftStatus,
}

impl CallableRecord {
    /// Validate the invariants listed in §3. Called after construction by
    /// the extractor+hasher pipeline; panics are never used for this check —
    /// callers receive a `Result`.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_line > self.end_line {
            return Err(format!(
                "start_line ({}) must be <= end_line ({})",
                self.start_line, self.end_line
            ));
        }
        if self.start_line < 1 {
            return Err("start_line must be >= 1".to_string());
        }
        if !is_hex64(&self.semantic_fingerprint) {
            return Err("semantic_fingerprint must be 64 lowercase hex characters".to_string());
        }
        if let Some(df) = &self.doc_fingerprint {
            if !is_hex64(df) {
                return Err("doc_fingerprint must be 64 lowercase hex characters".to_string());
            }
        }
        if self.is_method && self.class_name.is_none() {
            return Err("is_method requires class_name to be set".to_string());
        }
        Ok(())
    }

    /// Return a copy with an updated drift status (§3, Lifecycle).
    pub fn with_drift_status(&self, status: DriftStatus) -> Self {
        Self { drift_status: status, ..self.clone() }
    }

    pub fn has_docstring(&self) -> bool {
        self.docstring.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
    }
}

fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// A call expression found inside some callable (§3). `callee_name` is left
/// unresolved at extraction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub caller_id: CallableId,
    pub callee_name: String,
    pub call_line: u32,
}

/// An immutable record of what was true for a callable at the end of some
/// prior scan (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub callable_id: CallableId,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub semantic_fingerprint: String,
    pub doc_fingerprint: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Reduce a `CallableRecord` (plus the scan's timestamp) to a `Snapshot`.
    pub fn from_record(record: &CallableRecord, recorded_at: DateTime<Utc>) -> Self {
        Self {
            callable_id: record.id.clone(),
            file_path: record.file_path.clone(),
            start_line: record.start_line,
            end_line: record.end_line,
            semantic_fingerprint: record.semantic_fingerprint.clone(),
            doc_fingerprint: record.doc_fingerprint.clone(),
            recorded_at,
        }
    }
}

/// One entry in the append-only scan log (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRecord {
    pub scan_id: String,
    pub timestamp: DateTime<Utc>,
    pub root_directory: String,
    pub files_count: u32,
    pub callables_count: u32,
    pub parse_error_count: u32,
}

/// A per-file parse failure recorded during a scan (§7: per-file, scan continues).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub file_path: String,
    pub message: String,
}

/// The output of one orchestrated scan (§4.7), prior to classification.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub callables: Vec<CallableRecord>,
    pub call_sites: Vec<CallSite>,
    pub files_scanned: u32,
    pub errors: Vec<FileError>,
    pub elapsed_seconds: f64,
}

impl ScanResult {
    pub fn error_count(&self) -> u32 {
        self.errors.len() as u32
    }
}

/// The structured explanation a classifier rule produces alongside a status (§4.4).
#[derive(Debug, Clone)]
pub struct DriftExplanation {
    pub callable_id: CallableId,
    pub status: DriftStatus,
    pub reason: String,
    pub current_semantic_fingerprint: String,
    pub stored_semantic_fingerprint: Option<String>,
    pub current_doc_fingerprint: Option<String>,
    pub stored_doc_fingerprint: Option<String>,
    pub suggestions: Vec<String>,
}

/// Summary counters plus identifier lists for the non-fresh categories (§3, §4.4).
#[derive(Debug, Clone, Default)]
pub struct DriftReport {
    pub fresh_count: u32,
    pub stale_count: u32,
    pub undocumented_count: u32,
    pub stale_ids: Vec<CallableId>,
    pub undocumented_ids: Vec<CallableId>,
}

impl DriftReport {
    pub fn total(&self) -> u32 {
        self.fresh_count + self.stale_count + self.undocumented_count
    }
}

/// The snapshot store contract (§4.6). Implemented by `gen-d-storage`'s
/// SQLite backend; kept here so `gen-d-analysis`'s orchestrator can depend
/// on the contract without depending on a concrete backend.
pub trait SnapshotStore {
    /// Upsert snapshots; same identifier overwrites. Atomic as a whole.
    fn put_many(&self, records: &[CallableRecord], scan_id: &str) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Option<Snapshot>, StoreError>;

    fn get_all(&self) -> Result<BTreeMap<CallableId, Snapshot>, StoreError>;

    /// Delete all snapshots for one file; returns the number of rows removed.
    fn delete_by_file(&self, file_path: &str) -> Result<u64, StoreError>;

    /// Upsert call edges as (caller_id, callee_id_or_name, call_line); same
    /// (caller, callee) pair overwrites (§4.7: "persist nodes and edges").
    fn put_edges(&self, edges: &[(CallableId, CallableId, u32)]) -> Result<(), StoreError>;

    /// Record scan-level metadata; returns the freshly minted `scan_id`.
    fn record_scan(
        &self,
        root: &str,
        files: u32,
        callables: u32,
        errors: u32,
    ) -> Result<String, StoreError>;

    /// Most-recent-first scan history, truncated to `limit`.
    fn scan_history(&self, limit: u32) -> Result<Vec<ScanRecord>, StoreError>;

    /// Wipe all rows in all tables.
    fn clear(&self) -> Result<(), StoreError>;
}
