//! File discovery (§4.7): walk a root directory, excluding common noise
//! paths, yielding `*.py` files in deterministic order.

use std::path::{Path, PathBuf};

use gen_d_core::config::ScanConfig;

/// Directory names never walked into, regardless of `.gitignore` contents.
pub const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".venv",
    "venv",
    "site-packages",
];

/// Walk `root`, returning every `*.py` file not excluded by `.gitignore`,
/// `.driftignore`, or the default ignore list, sorted by path.
pub fn walk_directory(root: &Path, config: &ScanConfig) -> Vec<PathBuf> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .add_custom_ignore_filename(".driftignore");

    let threads = config.effective_threads();
    if threads > 0 {
        builder.threads(threads);
    }

    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    for pattern in DEFAULT_IGNORES {
        let _ = overrides.add(&format!("!{pattern}/**"));
        let _ = overrides.add(&format!("!{pattern}"));
    }
    for pattern in &config.extra_ignore {
        let _ = overrides.add(&format!("!{pattern}"));
    }
    if let Ok(built) = overrides.build() {
        builder.overrides(built);
    }

    let max_size = config.effective_max_file_size();
    let mut files: Vec<PathBuf> = builder
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("py"))
        .filter(|entry| entry.metadata().map(|m| m.len() <= max_size).unwrap_or(false))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_python_files_and_skips_noise_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "def f(): pass\n").unwrap();
        fs::create_dir_all(dir.path().join("__pycache__")).unwrap();
        fs::write(dir.path().join("__pycache__/a.cpython.pyc"), b"junk").unwrap();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();

        let files = walk_directory(dir.path(), &ScanConfig::default());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.py"));
    }

    #[test]
    fn sorts_output_deterministically() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.py"), "").unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();
        let files = walk_directory(dir.path(), &ScanConfig::default());
        assert!(files[0].ends_with("a.py"));
        assert!(files[1].ends_with("b.py"));
    }
}
