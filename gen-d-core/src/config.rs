//! Scan configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the file walker and scan orchestrator.
///
/// Every field is optional so a partially-specified `gen-d.toml` layers
/// cleanly over the defaults; callers read values through the
/// `effective_*()` accessors rather than the raw `Option` fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum file size in bytes to consider. Default: 5 MiB.
    pub max_file_size: Option<u64>,
    /// Number of worker threads for the rayon pool. 0 = rayon default (num cpus).
    pub threads: Option<usize>,
    /// Extra ignore patterns beyond `.gitignore` / `.driftignore` / the built-in noise list.
    #[serde(default)]
    pub extra_ignore: Vec<String>,
    /// Path to a `.gen-d.toml` config file override, if loaded from a non-default location.
    pub config_path: Option<String>,
}

impl ScanConfig {
    /// Effective max file size, defaulting to 5 MiB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(5 * 1024 * 1024)
    }

    /// Effective thread count; 0 means "let rayon decide".
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Load a `ScanConfig` from a TOML file, returning defaults if the file doesn't exist.
    pub fn load(path: &std::path::Path) -> Result<Self, crate::errors::ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| crate::errors::ConfigError::Io(path.display().to_string(), e.to_string()))?;
        toml::from_str(&text)
            .map_err(|e| crate::errors::ConfigError::Parse(path.display().to_string(), e.to_string()))
    }
}
