//! Draft slot backed by a single JSON file.

use event_wizard_core::draft_slot::{DraftSlot, SlotError, SlotFuture};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Stores the draft in one file, replacing it atomically on save.
///
/// Saves and clears run one at a time, in the order they were requested,
/// even when the caller stops waiting: a save that reached the filesystem
/// always lands before a later clear.
#[derive(Clone, Debug)]
pub struct FileDraftSlot {
    path: PathBuf,
    writes: Arc<Mutex<()>>,
}

impl FileDraftSlot {
    /// Slot stored at `path`. Parent directories are created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// File backing the slot
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        staging_path(&self.path)
    }

    /// Run `op` under the write lock on a detached task.
    ///
    /// Aborting the caller drops only the join handle; the task keeps the
    /// guard until the filesystem work is done.
    async fn exclusive<F>(&self, op: F) -> Result<(), SlotError>
    where
        F: Future<Output = Result<(), SlotError>> + Send + 'static,
    {
        let guard = Arc::clone(&self.writes).lock_owned().await;
        tokio::spawn(async move {
            let _guard = guard;
            op.await
        })
        .await
        .map_err(|e| SlotError::Io(format!("Draft write task failed: {e}")))?
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(action: &str, path: &Path, error: &std::io::Error) -> SlotError {
    SlotError::Io(format!("Failed to {action} {}: {error}", path.display()))
}

impl DraftSlot for FileDraftSlot {
    fn load(&self) -> SlotFuture<'_, Option<String>> {
        Box::pin(async move {
            match tokio::fs::read_to_string(&self.path).await {
                Ok(raw) => Ok(Some(raw)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(io_error("read", &self.path, &e)),
            }
        })
    }

    fn save(&self, draft: String) -> SlotFuture<'_, ()> {
        let path = self.path.clone();
        Box::pin(self.exclusive(async move {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| io_error("create", parent, &e))?;
            }

            let staging = staging_path(&path);
            tokio::fs::write(&staging, draft)
                .await
                .map_err(|e| io_error("write", &staging, &e))?;
            tokio::fs::rename(&staging, &path)
                .await
                .map_err(|e| io_error("replace", &path, &e))?;

            tracing::trace!(path = %path.display(), "Draft written");
            Ok(())
        }))
    }

    fn clear(&self) -> SlotFuture<'_, ()> {
        let path = self.path.clone();
        Box::pin(self.exclusive(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error("remove", &path, &e)),
            }
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileDraftSlot::new(dir.path().join("draft.json"));
        assert_eq!(slot.load().await.unwrap(), None);
        slot.clear().await.unwrap();
    }

    #[tokio::test]
    async fn save_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileDraftSlot::new(dir.path().join("nested/wizard/draft.json"));

        slot.save("one".to_string()).await.unwrap();
        slot.save("two".to_string()).await.unwrap();
        assert_eq!(slot.load().await.unwrap().as_deref(), Some("two"));
        assert!(!slot.staging_path().exists());

        slot.clear().await.unwrap();
        assert_eq!(slot.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_waits_for_abandoned_save() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileDraftSlot::new(dir.path().join("draft.json"));

        for _ in 0..20 {
            let writer = slot.clone();
            let save = tokio::spawn(async move { writer.save("draft".to_string()).await });
            tokio::task::yield_now().await;
            save.abort();

            slot.clear().await.unwrap();
            assert_eq!(slot.load().await.unwrap(), None);
        }
    }

    #[test]
    fn staging_file_sits_next_to_target() {
        let slot = FileDraftSlot::new("/var/data/draft.json");
        assert_eq!(slot.staging_path(), PathBuf::from("/var/data/draft.json.tmp"));
    }
}
