//! Error kinds, one `thiserror` enum per component, following the policy
//! table in §7: parse and hash failures are per-file and recorded rather
//! than propagated; store corruption and config errors are fatal.

/// Failure to parse source text into a CST.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at {position}: {message}")]
pub struct ParseError {
    pub position: String,
    pub message: String,
}

impl ParseError {
    pub fn new(position: impl Into<String>, message: impl Into<String>) -> Self {
        Self { position: position.into(), message: message.into() }
    }
}

/// Failure to normalize a callable's source text.
#[derive(Debug, Clone, thiserror::Error)]
#[error("normalize error: {0}")]
pub struct NormalizeError(pub String);

impl From<ParseError> for NormalizeError {
    fn from(e: ParseError) -> Self {
        NormalizeError(e.to_string())
    }
}

/// Failure to compute a fingerprint; wraps the underlying parse failure per §4.3.
#[derive(Debug, Clone, thiserror::Error)]
#[error("hash error: {0}")]
pub struct HashError(pub String);

impl From<NormalizeError> for HashError {
    fn from(e: NormalizeError) -> Self {
        HashError(e.0)
    }
}

/// Classifier-side errors. `classify` itself is total and infallible (§4.4,
/// §8 property 4); this variant exists only for malformed snapshot input
/// fed in from an external store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifyError {
    #[error("malformed fingerprint `{0}`: expected 64 lowercase hex characters")]
    MalformedFingerprint(String),
}

/// Errors surfaced by the snapshot store (§4.6, §7).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error accessing store at {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("store is corrupt: {0}")]
    Corruption(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors from loading `ScanConfig`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config at {0}: {1}")]
    Io(String, String),
    #[error("could not parse config at {0}: {1}")]
    Parse(String, String),
}

/// Aggregate error for the scan orchestrator; a scan itself almost never
/// fails wholesale (per-file errors are recorded, not propagated — §7), but
/// opening the store or the root directory can.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("root path does not exist or is not a directory: {0}")]
    InvalidRoot(String),
    #[error("scan cancelled before commit")]
    Cancelled,
    #[error(transparent)]
    Store(#[from] StoreError),
}
