//! JSON snapshot of the in-memory store.
//!
//! The operator CLI runs one command per process, so state is loaded from
//! and written back to a JSON file around every command. The snapshot is
//! the full dataset; partial writes are avoided by writing to a temp file
//! in the same directory and renaming over the target.

use std::fs;
use std::path::Path;

use super::{MemoryStore, StoreError, memory::MemoryInner};

impl MemoryStore {
    /// Serialize the whole store to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        let json = serde_json::to_string_pretty(&*inner)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Load a store previously written by [`MemoryStore::save`].
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path)?;
        let inner: MemoryInner = serde_json::from_str(&json)?;
        Ok(Self::from_inner(inner))
    }

    /// Load `path` if it exists, otherwise start empty.
    pub fn load_or_default(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}
