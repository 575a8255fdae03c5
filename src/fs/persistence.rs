//! Saving and restoring session state through a key-value blob store.
//!
//! The tree, working directory and history are stored as JSON under separate
//! keys next to a version tag. Data written under a different version, or a
//! saved root that is not a directory, is ignored and the caller falls back to
//! the default tree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::fs::types::FsNode;

pub const FS_VERSION: &str = "1.0";

pub const KEY_FILESYSTEM: &str = "filesystem";
pub const KEY_VERSION: &str = "fs-version";
pub const KEY_CURRENT_PATH: &str = "current-path";
pub const KEY_HISTORY: &str = "command-history";

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid saved data: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait BlobStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key inside a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Write the tree, cwd and history. Returns the number of bytes stored.
pub fn save_state(
    store: &mut dyn BlobStore,
    root: &FsNode,
    cwd: &[String],
    history: &[String],
) -> Result<usize, PersistError> {
    let tree = serde_json::to_string(root)?;
    let path = serde_json::to_string(cwd)?;
    let hist = serde_json::to_string(history)?;
    store.set(KEY_FILESYSTEM, &tree)?;
    store.set(KEY_VERSION, FS_VERSION)?;
    store.set(KEY_CURRENT_PATH, &path)?;
    store.set(KEY_HISTORY, &hist)?;
    let bytes = tree.len() + path.len() + hist.len() + FS_VERSION.len();
    log::debug!("saved session state ({} bytes)", bytes);
    Ok(bytes)
}

/// The saved tree, if it was written by this version and is well formed.
pub fn load_filesystem(store: &dyn BlobStore) -> Option<FsNode> {
    let version = store.get(KEY_VERSION).ok().flatten();
    if version.as_deref() != Some(FS_VERSION) {
        if let Some(v) = version {
            log::warn!("discarding saved filesystem with version {}", v);
        }
        return None;
    }
    let raw = store.get(KEY_FILESYSTEM).ok().flatten()?;
    match serde_json::from_str::<FsNode>(&raw) {
        Ok(mut root) if root.is_dir() => {
            root.normalize();
            log::info!("restored saved filesystem ({} nodes)", root.count_nodes());
            Some(root)
        }
        Ok(_) => {
            log::warn!("saved filesystem root is not a directory, using default tree");
            None
        }
        Err(e) => {
            log::warn!("saved filesystem is unreadable ({}), using default tree", e);
            None
        }
    }
}

pub fn load_current_path(store: &dyn BlobStore) -> Option<Vec<String>> {
    let raw = store.get(KEY_CURRENT_PATH).ok().flatten()?;
    serde_json::from_str(&raw).ok()
}

pub fn load_history(store: &dyn BlobStore) -> Vec<String> {
    store
        .get(KEY_HISTORY)
        .ok()
        .flatten()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn clear_state(store: &mut dyn BlobStore) -> Result<(), PersistError> {
    for key in [KEY_FILESYSTEM, KEY_VERSION, KEY_CURRENT_PATH, KEY_HISTORY] {
        store.remove(key)?;
    }
    Ok(())
}

/// Debounces saves: every change pushes the deadline out by `delay`.
#[derive(Debug, Clone)]
pub struct AutoSave {
    delay: Duration,
    deadline: Option<Instant>,
}

impl AutoSave {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.map_or(false, |d| now >= d)
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }
}
