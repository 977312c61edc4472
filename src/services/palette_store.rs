use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::PaletteStoreError;
use crate::models::PaletteTable;
use crate::services::storage::Storage;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9 _-]{0,63}\.act$").expect("palette pattern compiles")
    })
}

/// Validate a palette name: one `<stem>.act` component, nothing else
pub fn validate_name(name: &str) -> Result<(), PaletteStoreError> {
    if name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(PaletteStoreError::InvalidName(name.to_string()))
    }
}

/// Palette tables kept in a storage root.
///
/// Reads share the lock; `store` and `delete` take it exclusively, so a
/// palette is never read while it is being replaced or removed.
pub struct PaletteRepository {
    storage: Arc<dyn Storage>,
    lock: RwLock<()>,
}

impl PaletteRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            lock: RwLock::new(()),
        }
    }

    /// Sorted names of the stored palettes that `resolve` accepts
    pub fn list_available(&self) -> Result<Vec<String>, PaletteStoreError> {
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = self
            .storage
            .list()?
            .into_iter()
            .map(|f| f.name)
            .filter(|n| validate_name(n).is_ok())
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn resolve(&self, name: &str) -> Result<PaletteTable, PaletteStoreError> {
        validate_name(name)?;
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());
        if !self.storage.exists(name) {
            return Err(PaletteStoreError::NotFound(name.to_string()));
        }
        let bytes = self
            .storage
            .read(name)
            .map_err(|source| PaletteStoreError::CorruptPalette {
                name: name.to_string(),
                source,
            })?;
        tracing::debug!(palette = %name, bytes = bytes.len(), "Resolved palette");
        Ok(PaletteTable::from_bytes(&bytes))
    }

    /// Load a palette table from an arbitrary path. Short files are padded,
    /// so only I/O can fail.
    pub fn load(path: &Path) -> Result<PaletteTable, PaletteStoreError> {
        let bytes = fs::read(path).map_err(|source| PaletteStoreError::CorruptPalette {
            name: path.display().to_string(),
            source,
        })?;
        Ok(PaletteTable::from_bytes(&bytes))
    }

    pub fn store(&self, name: &str, bytes: &[u8]) -> Result<(), PaletteStoreError> {
        validate_name(name)?;
        if bytes.is_empty() {
            return Err(PaletteStoreError::InvalidPalette {
                name: name.to_string(),
                reason: "file is empty".to_string(),
            });
        }
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        self.storage.write(name, bytes)?;
        tracing::info!(palette = %name, bytes = bytes.len(), "Stored palette");
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<(), PaletteStoreError> {
        validate_name(name)?;
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        if !self.storage.exists(name) {
            return Err(PaletteStoreError::NotFound(name.to_string()));
        }
        self.storage.delete(name)?;
        tracing::info!(palette = %name, "Deleted palette");
        Ok(())
    }
}
