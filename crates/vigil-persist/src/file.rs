//! File-backed snapshot store.
//!
//! `JsonSnapshotStore` writes the full monitor state as one pretty-printed
//! JSON document.  Saves go to a sibling `.tmp` file first and are renamed
//! over the target, so a crash mid-write leaves either the old document or
//! the new one, never a torn file.  Concurrent external writers to the same
//! path are unsupported — there is deliberately no file locking.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    snapshot::MonitorSnapshot,
};
use vigil_core::traits::SnapshotStore;

/// A `SnapshotStore` backed by a single JSON file.
///
/// ```rust,ignore
/// use vigil_persist::JsonSnapshotStore;
///
/// let store = JsonSnapshotStore::new("data/monitor_state.json");
/// ```
#[derive(Debug)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store writing to `path`.  Parent directories are created on
    /// the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotStore for JsonSnapshotStore {
    /// Overwrite the document with `snapshot` via write-to-tmp + rename.
    ///
    /// Any I/O or serialization failure maps to `SnapshotFailed`; the caller
    /// (the monitor) treats that as non-fatal and retries on the next
    /// mutation.
    fn save(&self, snapshot: &MonitorSnapshot) -> VigilResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| VigilError::SnapshotFailed {
                    reason: format!(
                        "failed to create snapshot directory '{}': {}",
                        parent.display(),
                        e
                    ),
                })?;
            }
        }

        let json =
            serde_json::to_vec_pretty(snapshot).map_err(|e| VigilError::SnapshotFailed {
                reason: format!("failed to serialize snapshot: {}", e),
            })?;

        let tmp = self.tmp_path();
        fs::write(&tmp, &json).map_err(|e| VigilError::SnapshotFailed {
            reason: format!("failed to write '{}': {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| VigilError::SnapshotFailed {
            reason: format!(
                "failed to rename '{}' over '{}': {}",
                tmp.display(),
                self.path.display(),
                e
            ),
        })?;

        debug!(
            path = %self.path.display(),
            agents = snapshot.agents.len(),
            tasks = snapshot.tasks.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Load the stored document.
    ///
    /// A missing file is `Ok(None)` — first run, or an operator reset.  An
    /// unreadable or unparsable file is `Err(SnapshotFailed)`; the monitor
    /// logs it and starts empty.
    fn load(&self) -> VigilResult<Option<MonitorSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| VigilError::SnapshotFailed {
            reason: format!("failed to read '{}': {}", self.path.display(), e),
        })?;
        let snapshot =
            serde_json::from_str(&contents).map_err(|e| VigilError::SnapshotFailed {
                reason: format!("failed to parse '{}': {}", self.path.display(), e),
            })?;
        Ok(Some(snapshot))
    }
}
