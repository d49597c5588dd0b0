//! File-backed key-value store
//!
//! Provides a `KeyValueStore` that keeps a flat map of string entries in a
//! single JSON file, written atomically through a temporary file.

use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the store inside its directory
const STORE_FILE: &str = "last_location.json";

/// Errors that can occur while reading or writing the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No usable data directory (e.g. no home directory)
    #[error("No data directory available")]
    Unavailable,

    /// Reading or writing the store file failed
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store file is not a flat JSON object of strings
    #[error("Store file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Manages reading and writing string entries to disk
///
/// Entries live in `last_location.json` inside an XDG-compliant data
/// directory (`~/.local/share/citywx/` on Linux). Keys are kept sorted so
/// that writing the same entries twice produces the same bytes.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    /// Directory where the store file lives
    dir: PathBuf,
}

impl KeyValueStore {
    /// Creates a store in the XDG-compliant data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "citywx")?;
        Some(Self::with_dir(project_dirs.data_dir().to_path_buf()))
    }

    /// Creates a store in a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding the store file
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the store file
    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    /// Reads every entry; a missing file is an empty store
    pub fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(self.path()) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes several entries in one file update, keeping other keys
    ///
    /// A malformed store file is replaced rather than merged.
    pub fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut map = match self.read_all() {
            Ok(map) => map,
            Err(StoreError::Malformed(e)) => {
                tracing::warn!(error = %e, "replacing malformed store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.write_all(&map)
    }

    /// Removes the given keys; the file is deleted once it is empty
    pub fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut map = self.read_all()?;
        for key in keys {
            map.remove(*key);
        }
        if map.is_empty() {
            return match fs::remove_file(self.path()) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        self.write_all(&map)
    }

    /// Replaces the file contents with `map`
    fn write_all(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.dir.join(format!("{}.tmp", STORE_FILE));
        fs::write(&tmp, json)?;
        fs::rename(tmp, self.path())?;
        Ok(())
    }
}
