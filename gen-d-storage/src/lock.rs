//! Advisory file lock guarding the snapshot store directory (§5:
//! "multiple readers and a single writer at a time"), backed by `fd_lock`.

use std::fs::File;
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use gen_d_core::errors::StoreError;

pub struct WorkspaceLock {
    lock_file: RwLock<File>,
    lock_path: PathBuf,
}

impl WorkspaceLock {
    /// Open (creating if needed) the lock file at `<gen_d_dir>/workspace.lock`.
    pub fn new(gen_d_dir: &Path) -> Result<Self, StoreError> {
        let lock_path = gen_d_dir.join("workspace.lock");
        let file = File::create(&lock_path)
            .map_err(|e| StoreError::Io { path: lock_path.display().to_string(), source: e })?;
        Ok(Self { lock_file: RwLock::new(file), lock_path })
    }

    /// Acquire a non-blocking shared read lock. Multiple readers may hold this at once.
    pub fn read(&mut self) -> Result<fd_lock::RwLockReadGuard<'_, File>, StoreError> {
        self.lock_file
            .try_read()
            .map_err(|_| StoreError::Backend("a write is in progress; try again shortly".to_string()))
    }

    /// Acquire a non-blocking exclusive write lock.
    pub fn write(&mut self) -> Result<fd_lock::RwLockWriteGuard<'_, File>, StoreError> {
        self.lock_file
            .try_write()
            .map_err(|_| StoreError::Backend("another operation is in progress".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}
