pub mod explain;
pub mod history;
pub mod scan;
pub mod status;

use std::path::{Path, PathBuf};

use gen_d_analysis::extractor;
use gen_d_analysis::hasher;
use gen_d_analysis::scanner::walker;
use gen_d_core::config::ScanConfig;
use gen_d_core::types::{CallableRecord, DriftStatus, FileError};

/// `<project-root>/.gen-d/gen-d.db` unless overridden (§6, Default database path).
pub fn default_db_path(project_root: &Path) -> PathBuf {
    project_root.join(".gen-d").join("gen-d.db")
}

/// Load `<project-root>/.gen-d.toml` if present, else fall back to defaults.
pub fn load_config(project_root: &Path) -> ScanConfig {
    match ScanConfig::load(&project_root.join(".gen-d.toml")) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load .gen-d.toml, using defaults");
            ScanConfig::default()
        }
    }
}

/// Re-extract every callable under `root` without touching the snapshot
/// store. `status` and `explain` use this to compare the live tree against
/// what was last persisted (`cli/main.py`'s re-scan-then-diff behavior).
pub fn rescan_callables(root: &Path, config: &ScanConfig) -> (Vec<CallableRecord>, Vec<FileError>) {
    let files = walker::walk_directory(root, config);
    let mut callables = Vec::new();
    let mut errors = Vec::new();

    for path in files {
        let rel_path = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().to_string();
        let module_name = rel_path
            .trim_end_matches(".py")
            .replace(['/', '\\'], ".")
            .trim_end_matches(".__init__")
            .to_string();

        let source = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                errors.push(FileError { file_path: rel_path, message: e.to_string() });
                continue;
            }
        };

        let (extracted, _call_sites) = match extractor::extract(&source, &rel_path, Some(&module_name)) {
            Ok(v) => v,
            Err(e) => {
                errors.push(FileError { file_path: rel_path, message: e.to_string() });
                continue;
            }
        };

        for ec in extracted {
            let semantic_fingerprint = match hasher::semantic_fingerprint(&ec.source_text) {
                Ok(fp) => fp,
                Err(e) => {
                    errors.push(FileError { file_path: rel_path.clone(), message: e.0 });
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
                drift_status: DriftStatus::Undocumented,
            });
        }
    }

    (callables, errors)
}
