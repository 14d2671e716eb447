//! Snapshot persistence for the board.
//!
//! The board serializes its whole task list after every committed
//! mutation, addressed by a fixed storage key (one JSON file per key
//! under the data directory). Loading tolerates absence; callers treat
//! corruption as a recoverable condition and fall back to an empty board.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Storage key the board snapshot lives under.
pub const SNAPSHOT_KEY: &str = "tasks";

/// Pluggable persistence sink for board snapshots.
///
/// The board treats persistence as a side effect: save failures are
/// logged by the caller, never fatal.
pub trait SnapshotStore {
    /// Latest snapshot payload, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored snapshot.
    fn save(&self, payload: &str) -> Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Rc<S> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, payload: &str) -> Result<()> {
        (**self).save(payload)
    }
}

/// File-backed store: `<dir>/<key>.json`, lock-guarded atomic writes so
/// concurrent quadro processes never observe a partial snapshot.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store the snapshot for `key` under `dir`.
    pub fn new(dir: impl Into<PathBuf>, key: &str) -> Self {
        let path = dir.into().join(format!("{key}.json"));
        Self { path }
    }

    /// Store the snapshot in the per-user data directory.
    pub fn in_default_dir(key: &str) -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "quadro").ok_or(Error::DataDirUnavailable)?;
        Ok(Self::new(dirs.data_dir(), key))
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let payload = lock::read_locked_str(&self.path, DEFAULT_LOCK_TIMEOUT_MS)?;
        Ok(Some(payload))
    }

    fn save(&self, payload: &str) -> Result<()> {
        lock::write_atomic_locked(&self.path, payload.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
    }
}

/// In-memory store for tests and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out holding `payload`, as if a snapshot had been saved.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: RefCell::new(Some(payload.into())),
        }
    }

    /// Current stored payload, if any.
    pub fn snapshot(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.payload.borrow().clone())
    }

    fn save(&self, payload: &str) -> Result<()> {
        *self.payload.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}
