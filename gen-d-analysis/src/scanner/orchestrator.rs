//! Scan orchestrator (§4.7): walk a root directory, run extraction+hashing
//! over every discovered file in parallel (rayon fan-out, progress via an
//! atomic counter), fold the results into a `ScanResult`, and persist
//! through the snapshot store under a fresh `scan_id` (§5).

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use gen_d_core::config::ScanConfig;
use gen_d_core::errors::ScanError;
use gen_d_core::types::{CallableRecord, FileError, ScanResult, SnapshotStore};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::extractor;
use crate::graph::CallGraph;
use crate::hasher;
use crate::scanner::walker;

/// Per-file outcome of the extract+hash pipeline.
struct FileOutcome {
    callables: Vec<CallableRecord>,
    call_sites: Vec<gen_d_core::types::CallSite>,
    error: Option<FileError>,
}

/// Run one scan of `root` and persist its results through `store`.
///
/// Returns the `ScanResult` and the freshly minted `scan_id`. Cancellation
/// is checked between files; a cancelled scan returns before any snapshot
/// write happens, leaving the store untouched (§5).
pub fn scan(
    root: &Path,
    config: &ScanConfig,
    store: &dyn SnapshotStore,
    cancelled: &AtomicBool,
) -> Result<(ScanResult, String), ScanError> {
    if !root.is_dir() {
        return Err(ScanError::InvalidRoot(root.display().to_string()));
    }

    let started = Instant::now();
    info!(root = %root.display(), "scan started");

    let files = walker::walk_directory(root, config);
    let progress = AtomicUsize::new(0);

    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .filter_map(|path| {
            if cancelled.load(Ordering::Relaxed) {
                return None;
            }
            let n = progress.fetch_add(1, Ordering::Relaxed) + 1;
            if n % 100 == 0 {
                info!(files_processed = n, "scan progress");
            }
            Some(process_file(path, root))
        })
        .collect();

    if cancelled.load(Ordering::Relaxed) {
        info!("scan cancelled before commit; store left untouched");
        return Err(ScanError::Cancelled);
    }

    let mut result = ScanResult { files_scanned: outcomes.len() as u32, ..Default::default() };
    for outcome in outcomes {
        result.callables.extend(outcome.callables);
        result.call_sites.extend(outcome.call_sites);
        if let Some(e) = outcome.error {
            warn!(file = %e.file_path, message = %e.message, "parse failure");
            result.errors.push(e);
        }
    }
    result.elapsed_seconds = started.elapsed().as_secs_f64();

    let scan_id = store.record_scan(
        &root.display().to_string(),
        result.files_scanned,
        result.callables.len() as u32,
        result.error_count(),
    )?;
    store.put_many(&result.callables, &scan_id)?;

    let mut graph = CallGraph::new();
    for c in &result.callables {
        graph.add(c.clone());
    }
    for cs in &result.call_sites {
        graph.add_edge(&cs.caller_id, &cs.callee_name, cs.call_line);
    }
    store.put_edges(&graph.edges())?;

    info!(
        scan_id = %scan_id,
        files = result.files_scanned,
        callables = result.callables.len(),
        errors = result.error_count(),
        "scan complete"
    );

    Ok((result, scan_id))
}

fn process_file(path: &Path, root: &Path) -> FileOutcome {
    let rel_path = path.strip_prefix(root).unwrap_or(path).to_string_lossy().to_string();
    let module_name = module_name_from_path(&rel_path);

    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            return FileOutcome {
                callables: Vec::new(),
                call_sites: Vec::new(),
                error: Some(FileError { file_path: rel_path, message: e.to_string() }),
            }
        }
    };

    let (extracted, call_sites) = match extractor::extract(&source, &rel_path, Some(&module_name)) {
        Ok(v) => v,
        Err(e) => {
            return FileOutcome {
                callables: Vec::new(),
                call_sites: Vec::new(),
                error: Some(FileError { file_path: rel_path, message: e.to_string() }),
            }
        }
    };

    let mut callables = Vec::with_capacity(extracted.len());
    let mut file_error = None;
    for ec in extracted {
        let semantic_fingerprint = match hasher::semantic_fingerprint(&ec.source_text) {
            Ok(fp) => fp,
            Err(e) => {
                file_error.get_or_insert(FileError { file_path: rel_path.clone(), message: e.0.clone() });
                continue;
            }
        };
        let doc_fingerprint = ec.docstring.as_deref().and_then(|d| {
            if d.trim().is_empty() {
                None
            } else {
                Some(hasher::doc_fingerprint(d))
            }
        });
        callables.push(CallableRecord {
            id: ec.id,
            name: ec.name,
            file_path: ec.file_path,
            class_name: ec.class_name,
            is_method: ec.is_method,
            start_line: ec.start_line,
            end_line: ec.end_line,
            semantic_fingerprint,
            doc_fingerprint,
            docstring: ec.docstring,
            drift_status: gen_d_core::types::DriftStatus::Undocumented,
        });
    }

    FileOutcome { callables, call_sites, error: file_error }
}

fn module_name_from_path(rel_path: &str) -> String {
    rel_path
        .trim_end_matches(".py")
        .replace(['/', '\\'], ".")
        .trim_end_matches(".__init__")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use gen_d_core::errors::StoreError;
    use gen_d_core::types::{CallableId, ScanRecord, Snapshot};

    use super::*;

    #[test]
    fn module_name_strips_extension_and_joins_dirs() {
        assert_eq!(module_name_from_path("engine/hash/semantic_hash.py"), "engine.hash.semantic_hash");
    }

    #[test]
    fn module_name_collapses_init_py() {
        assert_eq!(module_name_from_path("engine/__init__.py"), "engine");
    }

    /// Records what it was asked to persist; used to assert the orchestrator
    /// actually calls `put_edges` instead of only `put_many`.
    #[derive(Default)]
    struct RecordingStore {
        edges: Mutex<Vec<(CallableId, CallableId, u32)>>,
    }

    impl SnapshotStore for RecordingStore {
        fn put_many(&self, _records: &[CallableRecord], _scan_id: &str) -> Result<(), StoreError> {
            Ok(())
        }
        fn get(&self, _id: &str) -> Result<Option<Snapshot>, StoreError> {
            Ok(None)
        }
        fn get_all(&self) -> Result<BTreeMap<CallableId, Snapshot>, StoreError> {
            Ok(BTreeMap::new())
        }
        fn delete_by_file(&self, _file_path: &str) -> Result<u64, StoreError> {
            Ok(0)
        }
        fn put_edges(&self, edges: &[(CallableId, CallableId, u32)]) -> Result<(), StoreError> {
            self.edges.lock().unwrap().extend_from_slice(edges);
            Ok(())
        }
        fn record_scan(
            &self,
            _root: &str,
            _files: u32,
            _callables: u32,
            _errors: u32,
        ) -> Result<String, StoreError> {
            Ok("scan-0".to_string())
        }
        fn scan_history(&self, _limit: u32) -> Result<Vec<ScanRecord>, StoreError> {
            Ok(Vec::new())
        }
        fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn scan_persists_call_edges() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("m.py"),
            "def g():\n    return 1\n\ndef f():\n    return g()\n",
        )
        .unwrap();

        let store = RecordingStore::default();
        let cancelled = AtomicBool::new(false);
        let (result, _scan_id) = scan(dir.path(), &ScanConfig::default(), &store, &cancelled).unwrap();

        assert!(!result.call_sites.is_empty(), "extractor should have found a call to g()");
        let edges = store.edges.lock().unwrap();
        assert!(
            edges.iter().any(|(caller, callee, _)| caller.ends_with(":m.f") && callee == "g"),
            "expected an edge from f to g, got {edges:?}"
        );
    }
}
