//! Key-value stores for actor snapshots

use crate::core::error::{BrainsError, Result};
use ahash::AHashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Opaque key-value store the renderer reads from
///
/// The simulation loop is the only writer.
pub trait SnapshotStore {
    /// Drop every key
    fn clear(&mut self) -> Result<()>;

    /// Write or overwrite one key
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<String>>;

    /// All keys, sorted
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-process store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

const RECORD_EXT: &str = "json";
const TEMP_EXT: &str = "tmp";

/// One `<key>.json` file per key in a directory
///
/// Writes go through a temp file and a rename, so a reader never sees a
/// half-written record.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open (and create if needed) the store directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| BrainsError::Store(format!("cannot open {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str, ext: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(BrainsError::Store(format!("invalid key {:?}", key)));
        }
        Ok(self.root.join(format!("{}.{}", key, ext)))
    }
}

impl SnapshotStore for DirectoryStore {
    fn clear(&mut self) -> Result<()> {
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let ours = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| ext == RECORD_EXT || ext == TEMP_EXT);
            if ours && path.is_file() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let temp = self.path_for(key, TEMP_EXT)?;
        let path = self.path_for(key, RECORD_EXT)?;
        fs::write(&temp, value)?;
        if let Err(e) = fs::rename(&temp, &path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key, RECORD_EXT)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
