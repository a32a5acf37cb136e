use crate::error::ClientError;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tempfile::NamedTempFile;
use tokio::sync::broadcast;

pub const PROFILE_CONFIG_KEY: &str = "profileConfig";
pub const PROFILE_VIEWS_KEY: &str = "profileViews";

const EVENT_CAPACITY: usize = 64;

/// Fired after a key changes, like the browser `storage` event.
/// `new_value` is `None` when the key was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub new_value: Option<String>,
}

/// Per-browser key/value storage shared by the admin and display pages.
/// Cloning yields another handle onto the same entries.
#[derive(Clone)]
pub struct LocalStorage {
    inner: Arc<Inner>,
}

struct Inner {
    entries: RwLock<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
    backing: Option<PathBuf>,
}

impl LocalStorage {
    pub fn in_memory() -> Self {
        Self::with_entries(BTreeMap::new(), None)
    }

    /// Storage persisted as a flat JSON object at `path`. A missing file
    /// starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self::with_entries(entries, Some(path)))
    }

    fn with_entries(entries: BTreeMap<String, String>, backing: Option<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(entries),
                events,
                backing,
            }),
        }
    }

    pub fn backing_path(&self) -> Option<&Path> {
        self.inner.backing.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// No event is sent when the value is unchanged. If the backing file
    /// cannot be written the entry keeps its previous value.
    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<(), ClientError> {
        let value = value.into();
        let mut entries = self.write();
        if entries.get(key) == Some(&value) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.insert(key.to_string(), value.clone());
        self.persist(&next)?;
        *entries = next;
        self.emit(key, Some(value));
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut entries = self.write();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        self.emit(key, None);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.inner.events.subscribe()
    }

    /// Increment the local view counter and return the new count. A missing
    /// or unparsable counter counts as zero.
    pub fn bump_views(&self) -> Result<u64, ClientError> {
        let count = self
            .get(PROFILE_VIEWS_KEY)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        self.set(PROFILE_VIEWS_KEY, count.to_string())?;
        Ok(count)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        let Some(path) = &self.inner.backing else {
            return Ok(());
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(entries)?)?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn emit(&self, key: &str, new_value: Option<String>) {
        // No receivers is fine.
        let _ = self.inner.events.send(StorageEvent {
            key: key.to_string(),
            new_value,
        });
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        match self.inner.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        match self.inner.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = LocalStorage::in_memory();
        assert!(storage.get(PROFILE_CONFIG_KEY).is_none());

        storage.set(PROFILE_CONFIG_KEY, "{}").unwrap();
        assert_eq!(storage.get(PROFILE_CONFIG_KEY).as_deref(), Some("{}"));

        storage.remove(PROFILE_CONFIG_KEY).unwrap();
        assert!(storage.get(PROFILE_CONFIG_KEY).is_none());
    }

    #[tokio::test]
    async fn mutations_notify_every_handle() {
        let storage = LocalStorage::in_memory();
        let other_tab = storage.clone();
        let mut events = other_tab.subscribe();

        storage.set(PROFILE_CONFIG_KEY, "a").unwrap();
        storage.set(PROFILE_CONFIG_KEY, "a").unwrap();
        storage.remove(PROFILE_CONFIG_KEY).unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            StorageEvent {
                key: PROFILE_CONFIG_KEY.into(),
                new_value: Some("a".into())
            }
        );
        // The repeated identical write is silent.
        assert_eq!(
            events.recv().await.unwrap(),
            StorageEvent {
                key: PROFILE_CONFIG_KEY.into(),
                new_value: None
            }
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn file_backed_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = LocalStorage::open(&path).unwrap();
        storage.set(PROFILE_CONFIG_KEY, r#"{"profile":{}}"#).unwrap();
        drop(storage);

        let reopened = LocalStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get(PROFILE_CONFIG_KEY).as_deref(),
            Some(r#"{"profile":{}}"#)
        );
        assert_eq!(reopened.backing_path(), Some(path.as_path()));
    }

    #[test]
    fn failed_write_keeps_previous_value_and_stays_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = LocalStorage::open(&path).unwrap();
        storage.set(PROFILE_CONFIG_KEY, "old").unwrap();
        let mut events = storage.subscribe();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(storage.set(PROFILE_CONFIG_KEY, "new").is_err());
        assert_eq!(storage.get(PROFILE_CONFIG_KEY).as_deref(), Some("old"));
        assert!(storage.remove(PROFILE_CONFIG_KEY).is_err());
        assert_eq!(storage.get(PROFILE_CONFIG_KEY).as_deref(), Some("old"));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn corrupt_backing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            LocalStorage::open(&path),
            Err(ClientError::Parse(_))
        ));
    }

    #[test]
    fn view_counter_starts_at_one() {
        let storage = LocalStorage::in_memory();
        assert_eq!(storage.bump_views().unwrap(), 1);
        assert_eq!(storage.bump_views().unwrap(), 2);

        storage.set(PROFILE_VIEWS_KEY, "garbage").unwrap();
        assert_eq!(storage.bump_views().unwrap(), 1);
    }
}
