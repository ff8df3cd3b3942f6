//! # gen-d-core
//!
//! Foundation crate for `gen-d`: the data model, error enums, and the
//! `SnapshotStore` contract every storage backend implements. No I/O lives
//! here — this crate only defines shapes other crates fill in.

pub mod config;
pub mod errors;
pub mod types;

pub use config::ScanConfig;
pub use errors::{ClassifyError, HashError, NormalizeError, ParseError, StoreError};
pub use types::{
    CallSite, CallableId, CallableRecord, DriftExplanation, DriftReport, DriftStatus, ScanRecord,
    ScanResult, Snapshot, SnapshotStore,
};
