mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use cli::{Args, Commands};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::builder().with_default_directive(Level::INFO.into()).from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    match args.command {
        Commands::Scan(a) => commands::scan::run(a),
        Commands::Status(a) => commands::status::run(a),
        Commands::Explain(a) => commands::explain::run(a),
        Commands::History(a) => commands::history::run(a),
    }
}
