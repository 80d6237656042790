//! Saved locations, persisted as a JSON list of strings under one key.

use anyhow::{Context, Result};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::error::LookupError;

/// Slot holding the favorites list.
pub const FAVORITES_KEY: &str = "weatherwise-favorites";

/// Minimal key-value substrate the favorites list is stored in.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process substrate.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Substrate keeping one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read favorites file: {}", path.display()))?;

        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create favorites directory: {}", self.dir.display())
        })?;

        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write favorites file: {}", path.display()))?;

        Ok(())
    }
}

/// Which way a toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Ordered, duplicate-free list of location labels.
///
/// Every mutation is written through to the substrate before it returns. If
/// the write fails the in-memory list is restored, so memory and storage never
/// disagree.
#[derive(Debug)]
pub struct FavoritesStore<S> {
    store: S,
    labels: Vec<String>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Read the favorites slot. A missing, unreadable or malformed slot yields
    /// an empty list.
    pub fn load(store: S) -> Self {
        let labels = read_labels(&store);
        Self { store, labels }
    }

    /// Re-read the slot, replacing the in-memory list.
    pub fn reload(&mut self) -> &[String] {
        self.labels = read_labels(&self.store);
        &self.labels
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn toggle(&mut self, label: &str) -> Result<Toggle, LookupError> {
        let previous = self.labels.clone();

        let outcome = match self.position(label) {
            Some(idx) => {
                self.labels.remove(idx);
                Toggle::Removed
            }
            None => {
                self.labels.push(label.to_string());
                Toggle::Added
            }
        };

        self.persist_or_rollback(previous)?;
        tracing::debug!(label, ?outcome, "Toggled favorite");
        Ok(outcome)
    }

    /// Remove `label` if present. Returns whether anything changed.
    pub fn remove(&mut self, label: &str) -> Result<bool, LookupError> {
        let Some(idx) = self.position(label) else {
            return Ok(false);
        };

        let previous = self.labels.clone();
        self.labels.remove(idx);
        self.persist_or_rollback(previous)?;
        tracing::debug!(label, "Removed favorite");
        Ok(true)
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    fn persist_or_rollback(&mut self, previous: Vec<String>) -> Result<(), LookupError> {
        let result = serde_json::to_string(&self.labels)
            .context("Failed to serialize favorites")
            .and_then(|json| self.store.set(FAVORITES_KEY, &json));

        if let Err(err) = result {
            self.labels = previous;
            tracing::warn!(error = %format!("{err:#}"), "Favorites write failed, rolled back");
            return Err(LookupError::PersistFailure(format!("{err:#}")));
        }

        Ok(())
    }
}

fn read_labels<S: KeyValueStore>(store: &S) -> Vec<String> {
    let raw = match store.get(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "Failed to read favorites, starting empty");
            return Vec::new();
        }
    };

    let parsed: Vec<String> = match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(err) => {
            tracing::warn!(error = %err, "Malformed favorites slot, starting empty");
            return Vec::new();
        }
    };

    let mut labels: Vec<String> = Vec::with_capacity(parsed.len());
    for label in parsed {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Substrate whose writes can be switched off.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                anyhow::bail!("quota exceeded");
            }
            self.inner.set(key, value)
        }
    }

    fn persisted<S: KeyValueStore>(store: &S) -> Vec<String> {
        let raw = store.get(FAVORITES_KEY).unwrap().unwrap_or_else(|| "[]".into());
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn toggle_twice_restores_original() {
        let mut favs = FavoritesStore::load(MemoryStore::new());

        assert_eq!(favs.toggle("Paris").unwrap(), Toggle::Added);
        assert_eq!(favs.labels(), ["Paris"]);
        assert_eq!(persisted(&favs.store), vec!["Paris"]);

        assert_eq!(favs.toggle("Paris").unwrap(), Toggle::Removed);
        assert!(favs.labels().is_empty());
        assert!(persisted(&favs.store).is_empty());
    }

    #[test]
    fn toggle_appends_in_insertion_order() {
        let mut favs = FavoritesStore::load(MemoryStore::new());
        favs.toggle("Paris").unwrap();
        favs.toggle("Oslo").unwrap();
        favs.toggle("Lima").unwrap();
        favs.toggle("Oslo").unwrap();

        assert_eq!(favs.labels(), ["Paris", "Lima"]);
    }

    #[test]
    fn remove_only_when_present() {
        let mut favs = FavoritesStore::load(MemoryStore::new());
        favs.toggle("Paris").unwrap();

        assert!(!favs.remove("Berlin").unwrap());
        assert!(favs.remove("Paris").unwrap());
        assert!(!favs.contains("Paris"));
        assert!(persisted(&favs.store).is_empty());
    }

    #[test]
    fn load_roundtrips_after_mutations() {
        let mut favs = FavoritesStore::load(MemoryStore::new());
        for label in ["A", "B", "C", "B", "D"] {
            favs.toggle(label).unwrap();
        }
        favs.remove("A").unwrap();

        let expected = favs.labels().to_vec();
        let reloaded = FavoritesStore::load(favs.into_inner());
        assert_eq!(reloaded.labels(), expected.as_slice());
    }

    #[test]
    fn malformed_slot_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{not json").unwrap();

        let favs = FavoritesStore::load(store);
        assert!(favs.labels().is_empty());
    }

    #[test]
    fn duplicates_in_slot_are_collapsed() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, r#"["Paris","Oslo","Paris"]"#).unwrap();

        let favs = FavoritesStore::load(store);
        assert_eq!(favs.labels(), ["Paris", "Oslo"]);
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut favs = FavoritesStore::load(FlakyStore::default());
        favs.toggle("Paris").unwrap();

        favs.store.fail_writes = true;

        let err = favs.toggle("Oslo").unwrap_err();
        assert!(matches!(err, LookupError::PersistFailure(_)));
        assert_eq!(favs.labels(), ["Paris"]);

        let err = favs.remove("Paris").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(favs.labels(), ["Paris"]);
        assert_eq!(persisted(&favs.store), vec!["Paris"]);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        let mut favs = FavoritesStore::load(store.clone());
        assert!(favs.labels().is_empty());
        favs.toggle("Paris").unwrap();
        favs.toggle("Tokyo").unwrap();

        let reloaded = FavoritesStore::load(store);
        assert_eq!(reloaded.labels(), ["Paris", "Tokyo"]);
    }
}
