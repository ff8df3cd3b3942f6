use std::process::ExitCode;

use gen_d_analysis::build_report;
use gen_d_core::types::SnapshotStore;
use gen_d_storage::SqliteSnapshotStore;

use crate::cli::Status;
use crate::commands::{default_db_path, load_config, rescan_callables};
use crate::output;

pub fn run(args: Status) -> ExitCode {
    let root = match args.path.unwrap_or_else(|| ".".into()).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let db_path = args.db.unwrap_or_else(|| default_db_path(&root));

    if !db_path.exists() {
        println!("No scan data found. Run `gdg scan {}` first.", root.display());
        return ExitCode::FAILURE;
    }

    let store = match SqliteSnapshotStore::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: failed to open database at {}: {e}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let snapshots = match store.get_all() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if snapshots.is_empty() {
        println!("No callables found in database.");
        return ExitCode::SUCCESS;
    }

    println!("Documentation status: {}", root.display());
    let config = load_config(&root);
    let (callables, errors) = rescan_callables(&root, &config);
    if !errors.is_empty() {
        eprintln!("warning: {} file(s) had parse errors during re-scan", errors.len());
    }

    let report = build_report(&callables, &snapshots);
    output::print_status_table(&report);

    if !report.stale_ids.is_empty() {
        let limit = if args.all { None } else { Some(5) };
        output::print_stale_list(&report.stale_ids, limit);
    }

    if !report.undocumented_ids.is_empty() {
        println!(
            "\n{} callable(s) are undocumented. Use `gdg explain <id>` for details.",
            report.undocumented_count
        );
    }

    ExitCode::SUCCESS
}
