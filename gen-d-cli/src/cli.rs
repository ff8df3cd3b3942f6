//! Argument parsing (§6, CLI surface). Grounded on the clap derive style
//! used across the pack's `bin` crates.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gdg", author, version, about = "Documentation drift detector for Python codebases", long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a Python codebase and persist the resulting snapshots
    Scan(Scan),
    /// Re-scan and print a documentation drift summary
    Status(Status),
    /// Re-scan and explain the drift status of one callable
    Explain(Explain),
    /// Print recent scan history
    History(History),
}

#[derive(Debug, Parser)]
pub struct Scan {
    /// Path to the Python project to scan
    pub path: PathBuf,
    /// Path to the database file (default: <path>/.gen-d/gen-d.db)
    #[arg(long, short = 'd')]
    pub db: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct Status {
    /// Path to the project (default: current directory)
    pub path: Option<PathBuf>,
    /// Path to the database file
    #[arg(long, short = 'd')]
    pub db: Option<PathBuf>,
    /// Show all stale callables, not just the top 5
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Parser)]
pub struct Explain {
    /// Callable identifier, full or suffix (e.g. module.Class.method)
    pub id: String,
    /// Path to the project (default: current directory)
    pub path: Option<PathBuf>,
    /// Path to the database file
    #[arg(long, short = 'd')]
    pub db: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct History {
    /// Path to the project (default: current directory)
    pub path: Option<PathBuf>,
    /// Path to the database file
    #[arg(long, short = 'd')]
    pub db: Option<PathBuf>,
    /// Number of scans to show
    #[arg(long, short = 'n', default_value_t = 10)]
    pub limit: u32,
}
