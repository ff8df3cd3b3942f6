use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use gen_d_storage::SqliteSnapshotStore;
use tracing::error;

use crate::cli::Scan;
use crate::commands::{default_db_path, load_config};
use crate::output;

pub fn run(args: Scan) -> ExitCode {
    let root = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {}: {e}", args.path.display());
            return ExitCode::FAILURE;
        }
    };
    let db_path = args.db.unwrap_or_else(|| default_db_path(&root));

    println!("Scanning: {}", root.display());

    let config = load_config(&root);
    let store = match SqliteSnapshotStore::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to open database");
            eprintln!("error: failed to open database at {}: {e}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let cancelled = AtomicBool::new(false);
    let (result, scan_id) = match gen_d_analysis::scanner::scan(&root, &config, &store, &cancelled) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    output::print_scan_summary(&result, &scan_id, &db_path.display().to_string());

    if result.error_count() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
