//! # gen-d-storage
//!
//! SQLite persistence for gen-d's snapshot store and scan log (§4.6, §6).
//! WAL mode, single-writer/multi-reader via an advisory file lock.

pub mod engine;
pub mod lock;
pub mod schema;

pub use engine::SqliteSnapshotStore;
pub use lock::WorkspaceLock;
