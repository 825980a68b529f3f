use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::KeyValueStore;

/// Extension for entry files in the data directory
const ENTRY_EXTENSION: &str = "entry";

/// File-backed store: each key lives in `<dir>/<key>.entry`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Keys map straight onto file names, so only a conservative character set is accepted.
    fn is_valid_key(key: &str) -> bool {
        !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        if Self::is_valid_key(key) {
            Some(self.dir.join(format!("{}.{}", key, ENTRY_EXTENSION)))
        } else {
            warn!(key, "Rejected storage key");
            None
        }
    }

    fn write_entry(&self, path: &Path, value: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension(format!("{}.tmp", ENTRY_EXTENSION));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, path)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                warn!(error = %e, key, "Failed to read storage entry");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        match self.write_entry(&path, value) {
            Ok(()) => debug!(key, "Storage entry written"),
            Err(e) => warn!(error = %e, key, "Failed to write storage entry"),
        }
    }

    fn remove(&self, key: &str) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(error = %e, key, "Failed to remove storage entry");
            }
        }
    }
}
