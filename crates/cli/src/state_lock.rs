// State Lock - exclusive advisory lock beside the state file

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `<state file>.lock` next to the state file
pub fn lock_path_for(state_path: &Path) -> PathBuf {
    let mut name = state_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "queue.json".into());
    name.push(".lock");
    state_path.with_file_name(name)
}

/// Held for one load, apply and save cycle; released on drop
///
/// Every queuesnip process sharing a state file takes this lock before
/// reading it for a change, so ticket numbers and joins from other
/// terminals are never lost.
pub struct StateLock {
    file: File,
    path: PathBuf,
}

impl StateLock {
    /// Block until the lock is ours
    pub async fn acquire(path: PathBuf) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::acquire_blocking(path))
            .await
            .context("State lock task failed")?
    }

    fn acquire_blocking(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file {}", path.display()))?;

        FileExt::lock_exclusive(&file)
            .with_context(|| format!("Failed to lock {}", path.display()))?;

        debug!(path = %path.display(), "State lock acquired");
        Ok(Self { file, path })
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "Failed to release state lock");
        } else {
            debug!(path = %self.path.display(), "State lock released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_lock_path_sits_beside_state_file() {
        assert_eq!(
            lock_path_for(Path::new("/var/lib/queuesnip/queue.json")),
            PathBuf::from("/var/lib/queuesnip/queue.json.lock")
        );
    }

    #[tokio::test]
    async fn test_second_holder_waits_for_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/queue.json.lock");

        let first = StateLock::acquire(path.clone()).await.unwrap();
        assert!(path.exists());

        let waiting = tokio::spawn(StateLock::acquire(path.clone()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!waiting.is_finished());

        drop(first);
        let second = tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .unwrap()
            .unwrap();
        assert!(second.is_ok());
    }
}
