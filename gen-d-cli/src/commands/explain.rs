use std::process::ExitCode;

use gen_d_analysis::classifier::explain as explain_drift;
use gen_d_core::types::SnapshotStore;
use gen_d_storage::SqliteSnapshotStore;

use crate::cli::Explain;
use crate::commands::{default_db_path, load_config, rescan_callables};
use crate::output;

pub fn run(args: Explain) -> ExitCode {
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

    let config = load_config(&root);
    let (callables, _errors) = rescan_callables(&root, &config);

    let found = callables
        .iter()
        .find(|c| c.id == args.id || c.id.ends_with(&format!(":{}", args.id)));

    let record = match found {
        Some(r) => r,
        None => {
            let matches: Vec<&str> = callables
                .iter()
                .filter(|c| c.id.contains(&args.id))
                .map(|c| c.id.as_str())
                .take(5)
                .collect();
            if matches.is_empty() {
                println!("Callable '{}' not found.", args.id);
            } else {
                println!("Callable '{}' not found. Did you mean:", args.id);
                for m in matches {
                    println!("   - {m}");
                }
            }
            return ExitCode::FAILURE;
        }
    };

    let snapshot = match store.get(&record.id) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let explanation = explain_drift(record, snapshot.as_ref());
    output::print_explanation(&explanation);

    ExitCode::SUCCESS
}
