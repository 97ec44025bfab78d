use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::{collections::HashMap, fs, path::PathBuf};

use crate::model::PersistedLocation;

/// Key the last searched location is stored under.
pub const LOCATION_KEY: &str = "location";

/// Durable home of the last searched location. Each save overwrites.
pub trait LocationStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedLocation>>;

    fn save(&self, location: &PersistedLocation) -> Result<()>;
}

/// Key-value store keeping one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileLocationStore {
    dir: PathBuf,
}

impl FileLocationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocationStore for FileLocationStore {
    fn load(&self) -> Result<Option<PersistedLocation>> {
        let path = self.path_for(LOCATION_KEY);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read stored location: {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let location = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse stored location: {}", path.display()))?;

        Ok(Some(location))
    }

    fn save(&self, location: &PersistedLocation) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create data directory: {}", self.dir.display())
        })?;

        let path = self.path_for(LOCATION_KEY);
        let json = serde_json::to_string(location).context("Failed to serialize location")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write stored location: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "saved location");
        Ok(())
    }
}

/// In-process store; holds serialized records so reads behave like the file store.
#[derive(Debug, Default)]
pub struct MemoryLocationStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw value, e.g. a hand-written or corrupt record.
    pub fn with_raw(key: &str, raw: impl Into<String>) -> Self {
        let store = Self::default();
        store.entries.lock().insert(key.to_string(), raw.into());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl LocationStore for MemoryLocationStore {
    fn load(&self) -> Result<Option<PersistedLocation>> {
        match self.raw(LOCATION_KEY) {
            Some(raw) => {
                let location =
                    serde_json::from_str(&raw).context("Failed to parse stored location")?;
                Ok(Some(location))
            }
            None => Ok(None),
        }
    }

    fn save(&self, location: &PersistedLocation) -> Result<()> {
        let json = serde_json::to_string(location).context("Failed to serialize location")?;
        self.entries.lock().insert(LOCATION_KEY.to_string(), json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> PersistedLocation {
        PersistedLocation {
            city: "Paris".into(),
            state: String::new(),
            country: "FR".into(),
            lat: 48.85,
            lon: 2.35,
        }
    }

    #[test]
    fn file_store_is_empty_before_first_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocationStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_overwrites_previous_location() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocationStore::new(dir.path().join("nested"));

        store.save(&paris()).unwrap();
        let mut oslo = paris();
        oslo.city = "Oslo".into();
        oslo.country = "NO".into();
        store.save(&oslo).unwrap();

        assert_eq!(store.load().unwrap(), Some(oslo));
    }

    #[test]
    fn file_store_reports_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocationStore::new(dir.path());
        fs::write(store.path_for(LOCATION_KEY), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse stored location"));
    }

    #[test]
    fn memory_store_reads_legacy_string_coordinates() {
        let store = MemoryLocationStore::with_raw(
            LOCATION_KEY,
            r#"{"city":"paris","state":"","country":"fr","lat":"48.85","lon":"2.35"}"#,
        );
        let loc = store.load().unwrap().unwrap();
        assert_eq!(loc.lat, 48.85);
        assert_eq!(loc.lon, 2.35);
    }

    #[test]
    fn memory_store_writes_numbers() {
        let store = MemoryLocationStore::new();
        store.save(&paris()).unwrap();
        let raw = store.raw(LOCATION_KEY).unwrap();
        assert!(raw.contains(r#""lat":48.85"#));
    }
}
