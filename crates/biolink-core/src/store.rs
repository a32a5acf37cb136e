use crate::error::CoreError;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

/// The profile document on disk. Read and written wholesale: there is no
/// merge, no versioning and no locking, so the last save wins.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` until a document has been written for the first time.
    pub async fn load(&self) -> Result<Option<Value>, CoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored document. Any JSON value is accepted as is.
    /// Returns the number of bytes written.
    pub async fn save(&self, document: &Value) -> Result<usize, CoreError> {
        let text = serde_json::to_string_pretty(document)?;
        let bytes = text.len();
        replace_file(&self.path, text.into_bytes()).await?;
        tracing::info!("config: saved {} bytes to {}", bytes, self.path.display());
        Ok(bytes)
    }
}

/// Write `data` to a temp file next to `path` and rename it over `path`, so a
/// concurrent reader sees either the old or the new file, never a torn one.
pub(crate) async fn replace_file(path: &Path, data: Vec<u8>) -> Result<(), CoreError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<(), CoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| CoreError::Io(e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| CoreError::Internal(format!("write task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn load_before_first_save_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        let doc = json!({"profile": {"username": "a"}, "badges": [], "socialLinks": []});

        store.save(&doc).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn save_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        store
            .save(&json!({"profile": {"username": "a"}, "theme": {"accentColor": "#fff"}}))
            .await
            .unwrap();
        store.save(&json!({"profile": {"bio": "b"}})).await.unwrap();

        assert_eq!(
            store.load().await.unwrap(),
            Some(json!({"profile": {"bio": "b"}}))
        );
    }

    #[tokio::test]
    async fn document_is_written_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(&path);
        store.save(&json!({"a": 1})).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ConfigStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[tokio::test]
    async fn save_creates_missing_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("config.json"));
        store.save(&json!({})).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(json!({})));
    }
}
