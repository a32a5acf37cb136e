use crate::error::CoreError;
use crate::store::replace_file;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct ViewsFile {
    #[serde(default)]
    count: u64,
}

/// Page-view counter persisted as `{"count": n}`.
pub struct ViewCounter {
    path: PathBuf,
    // Serializes read-modify-write cycles inside this process.
    write_lock: Mutex<()>,
}

impl ViewCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current count. Creates the file with a zero count on first use.
    pub async fn current(&self) -> Result<u64, CoreError> {
        let _guard = self.write_lock.lock().await;
        match self.read().await? {
            Some(views) => Ok(views.count),
            None => {
                self.write(ViewsFile::default()).await?;
                Ok(0)
            }
        }
    }

    /// Add one view and return the new total.
    pub async fn increment(&self) -> Result<u64, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut views = self.read().await?.unwrap_or_default();
        views.count = views.count.saturating_add(1);
        self.write(views).await?;
        Ok(views.count)
    }

    async fn read(&self) -> Result<Option<ViewsFile>, CoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, views: ViewsFile) -> Result<(), CoreError> {
        let text = serde_json::to_string_pretty(&views)?;
        replace_file(&self.path, text.into_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn current_initializes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");
        let counter = ViewCounter::new(&path);

        assert_eq!(counter.current().await.unwrap(), 0);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn increment_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");

        let counter = ViewCounter::new(&path);
        assert_eq!(counter.increment().await.unwrap(), 1);
        assert_eq!(counter.increment().await.unwrap(), 2);

        let reopened = ViewCounter::new(&path);
        assert_eq!(reopened.current().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let counter = std::sync::Arc::new(ViewCounter::new(dir.path().join("views.json")));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let counter = counter.clone();
            tasks.push(tokio::spawn(async move { counter.increment().await.unwrap() }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(counter.current().await.unwrap(), 8);
    }
}
