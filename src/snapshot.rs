//! Snapshot persistence.
//!
//! A [`Snapshot`] captures the caller's last inputs and result so they
//! can be restored after a restart.  Snapshots are stored as JSON blobs
//! in a key-value [`SnapshotStore`] under [`SNAPSHOT_KEY`].  The
//! calculator itself never reads or writes snapshots.

use crate::error::{EngineError, Result};
use crate::models::{CalculationResult, ChallengeSelection, CompanyProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::info;

/// Storage key for the calculator state.
pub const SNAPSHOT_KEY: &str = "saas-migration-calculator";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub profile: CompanyProfile,
    #[serde(default)]
    pub challenges: ChallengeSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CalculationResult>,
}

/// Key-value storage for snapshots.
///
/// Stores are shared between request handlers and must be `Send + Sync`.
pub trait SnapshotStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<Snapshot>>;
    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()>;
    /// Remove the entry.  Removing a missing key is not an error.
    fn clear(&self, key: &str) -> Result<()>;
}

/// Process-local store.  Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Snapshot>> {
        let blobs = self.blobs.read().map_err(|_| EngineError::SnapshotLock)?;
        match blobs.get(key) {
            Some(blob) => Ok(Some(serde_json::from_str(blob)?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        let blob = serde_json::to_string(snapshot)?;
        self.blobs
            .write()
            .map_err(|_| EngineError::SnapshotLock)?
            .insert(key.to_string(), blob);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.blobs
            .write()
            .map_err(|_| EngineError::SnapshotLock)?
            .remove(key);
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Snapshot>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        std::fs::write(&path, serde_json::to_vec_pretty(snapshot)?)?;
        info!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
