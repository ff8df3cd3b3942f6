use std::process::ExitCode;

use gen_d_core::types::SnapshotStore;
use gen_d_storage::SqliteSnapshotStore;

use crate::cli::History;
use crate::commands::default_db_path;
use crate::output;

pub fn run(args: History) -> ExitCode {
    let root = match args.path.unwrap_or_else(|| ".".into()).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let db_path = args.db.unwrap_or_else(|| default_db_path(&root));

    if !db_path.exists() {
        println!("No scan history found.");
        return ExitCode::SUCCESS;
    }

    let store = match SqliteSnapshotStore::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: failed to open database at {}: {e}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let scans = match store.scan_history(args.limit) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if scans.is_empty() {
        println!("No scans recorded.");
        return ExitCode::SUCCESS;
    }

    output::print_history_table(&scans);
    ExitCode::SUCCESS
}
