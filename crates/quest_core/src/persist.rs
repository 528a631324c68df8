//! Namespaced JSON state persistence
//!
//! Every store keeps its whole state in memory and serializes it under a
//! single namespace file (`<data_dir>/<namespace>.json`). State is loaded
//! once when the store opens; every mutation writes the full state back.
//!
//! Writes are best-effort: a failed save is logged and swallowed, leaving
//! the in-memory state authoritative for the rest of the session. There is
//! no migration or versioning on load.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Handle to one store's state file.
pub struct StateFile {
    path: PathBuf,
    namespace: &'static str,
}

impl StateFile {
    /// Open (and create, if needed) the data directory for a namespace.
    /// This is the only fallible entry point of the persistence layer.
    pub fn open(dir: &Path, namespace: &'static str) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {:?}", dir))?;
        Ok(Self {
            path: dir.join(format!("{}.json", namespace)),
            namespace,
        })
    }

    /// Load the namespace state. A missing file means a fresh store; an
    /// unparsable file degrades to defaults rather than aborting startup.
    pub fn load<T: DeserializeOwned + Default>(&self) -> T {
        match fs::read_to_string(&self.path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Unparsable state for '{}', starting empty: {}", self.namespace, e);
                    T::default()
                }
            },
            Err(_) => T::default(),
        }
    }

    /// Write the full state back. Failures are logged; the caller's
    /// in-memory state is already correct, only durability is lost.
    pub fn save<T: Serialize>(&self, state: &T) {
        if let Err(e) = self.try_save(state) {
            warn!("Failed to persist '{}' state: {}", self.namespace, e);
        }
    }

    fn try_save<T: Serialize>(&self, state: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Demo {
        count: u32,
        label: String,
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempdir().unwrap();
        let file = StateFile::open(dir.path(), "demo").unwrap();
        let state: Demo = file.load();
        assert_eq!(state, Demo::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let file = StateFile::open(dir.path(), "demo").unwrap();

        let state = Demo {
            count: 7,
            label: "seven".to_string(),
        };
        file.save(&state);

        let reloaded: Demo = StateFile::open(dir.path(), "demo").unwrap().load();
        assert_eq!(reloaded, state);
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("demo.json"), "{not json").unwrap();

        let file = StateFile::open(dir.path(), "demo").unwrap();
        let state: Demo = file.load();
        assert_eq!(state, Demo::default());
    }
}
