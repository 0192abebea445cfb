//! Saved games library.
//!
//! The library is a set of `GameSummary` keyed by game id, kept in insertion
//! order. It is persisted as a JSON array under a single fixed key of a
//! `KeyValueStore`, rewritten in full after every mutation.
//!
//! Readers get an immutable `Arc` snapshot; `toggle` builds a new list and swaps
//! it in, so a snapshot taken before a write never changes underneath its holder.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::model::GameSummary;

/// Storage key holding the library
pub const LIBRARY_KEY: &str = "savedGames";

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize library: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key-value persistence
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, LibraryError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), LibraryError>;
}

/// Key-value store keeping one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory for this user
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "gamehub", "GameHub")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, LibraryError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LibraryError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        // Write next to the target and rename so a crash never leaves half a file
        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// The user's saved games
pub struct LibraryStore<S: KeyValueStore> {
    store: S,
    games: Arc<Vec<GameSummary>>,
}

impl<S: KeyValueStore> LibraryStore<S> {
    /// Load the library from `store`.
    ///
    /// Missing or malformed data yields an empty library rather than an error.
    pub fn load(store: S) -> Self {
        let games = match store.get(LIBRARY_KEY) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<GameSummary>>(&content) {
                Ok(games) => dedup_by_id(games),
                Err(e) => {
                    tracing::warn!("Ignoring malformed library data: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => {
                tracing::info!("No saved library found, starting empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to read library: {}", e);
                Vec::new()
            }
        };

        tracing::info!("Loaded library with {} games", games.len());
        Self {
            store,
            games: Arc::new(games),
        }
    }

    /// Read-only snapshot of the current library
    pub fn snapshot(&self) -> Arc<Vec<GameSummary>> {
        Arc::clone(&self.games)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.games.iter().any(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Remove `game` if saved, otherwise add it, then persist.
    ///
    /// The in-memory library is updated even when the write fails; the error is
    /// returned so the caller can report it.
    pub fn toggle(&mut self, game: &GameSummary) -> Result<Arc<Vec<GameSummary>>, LibraryError> {
        let mut games: Vec<GameSummary> = self.games.as_ref().clone();
        if let Some(pos) = games.iter().position(|g| g.id == game.id) {
            games.remove(pos);
            tracing::info!("Removed {} from library", game.name);
        } else {
            games.push(game.clone());
            tracing::info!("Added {} to library", game.name);
        }

        self.games = Arc::new(games);
        self.persist()?;
        Ok(self.snapshot())
    }

    fn persist(&self) -> Result<(), LibraryError> {
        let content = serde_json::to_string(self.games.as_ref())?;
        self.store.set(LIBRARY_KEY, &content)?;
        tracing::debug!("Persisted library ({} games)", self.games.len());
        Ok(())
    }
}

fn dedup_by_id(games: Vec<GameSummary>) -> Vec<GameSummary> {
    let mut seen = HashSet::new();
    games.into_iter().filter(|g| seen.insert(g.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
        fail_writes: bool,
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, LibraryError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), LibraryError> {
            if self.fail_writes {
                return Err(std::io::Error::other("disk full").into());
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    impl KeyValueStore for &MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, LibraryError> {
            (**self).get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), LibraryError> {
            (**self).set(key, value)
        }
    }

    fn game(id: u64) -> GameSummary {
        serde_json::from_value(serde_json::json!({ "id": id, "name": format!("Game {}", id) }))
            .unwrap()
    }

    #[test]
    fn test_load_absent_is_empty() {
        let library = LibraryStore::load(MemoryStore::default());
        assert!(library.is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let store = MemoryStore::default();
        store.set(LIBRARY_KEY, "{not json").unwrap();
        let library = LibraryStore::load(store);
        assert!(library.is_empty());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut library = LibraryStore::load(MemoryStore::default());
        let g = game(42);

        let after_add = library.toggle(&g).unwrap();
        assert_eq!(after_add.len(), 1);
        assert!(library.contains(42));

        let after_remove = library.toggle(&g).unwrap();
        assert!(after_remove.is_empty());
        assert!(!library.contains(42));
    }

    #[test]
    fn test_toggle_twice_restores_original_set() {
        let mut library = LibraryStore::load(MemoryStore::default());
        library.toggle(&game(1)).unwrap();
        library.toggle(&game(2)).unwrap();
        let before: HashSet<u64> = library.snapshot().iter().map(|g| g.id).collect();

        library.toggle(&game(1)).unwrap();
        library.toggle(&game(1)).unwrap();
        let after: HashSet<u64> = library.snapshot().iter().map(|g| g.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_every_toggle_persists() {
        let store = MemoryStore::default();
        {
            let mut library = LibraryStore::load(&store);
            library.toggle(&game(7)).unwrap();
            library.toggle(&game(8)).unwrap();
        }

        let reloaded = LibraryStore::load(&store);
        let ids: Vec<u64> = reloaded.snapshot().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_toggle() {
        let mut library = LibraryStore::load(MemoryStore::default());
        library.toggle(&game(1)).unwrap();
        let snapshot = library.snapshot();
        library.toggle(&game(2)).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_failed_persist_keeps_memory_state() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut library = LibraryStore::load(store);
        assert!(library.toggle(&game(5)).is_err());
        assert!(library.contains(5));
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let store = MemoryStore::default();
        store
            .set(LIBRARY_KEY, r#"[{"id":1,"name":"A"},{"id":1,"name":"A again"},{"id":2,"name":"B"}]"#)
            .unwrap();
        let library = LibraryStore::load(store);
        assert_eq!(library.len(), 2);
        assert_eq!(library.snapshot()[0].name, "A");
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));

        assert_eq!(store.get(LIBRARY_KEY).unwrap(), None);

        let mut library = LibraryStore::load(store.clone());
        library.toggle(&game(99)).unwrap();
        assert!(store.path_for(LIBRARY_KEY).exists());

        let reloaded = LibraryStore::load(store);
        assert!(reloaded.contains(99));
    }
}
