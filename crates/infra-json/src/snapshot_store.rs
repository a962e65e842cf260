// JSON File SnapshotStore Implementation

use async_trait::async_trait;
use queuesnip_core::domain::QueueSnapshot;
use queuesnip_core::error::{AppError, Result};
use queuesnip_core::port::SnapshotStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

fn io_error(action: &str, path: &Path, err: std::io::Error) -> AppError {
    AppError::Persistence(format!("failed to {} {}: {}", action, path.display(), err))
}

/// Stores the queue snapshot as a pretty-printed JSON file
///
/// Saves go to a sibling temp file that is then renamed over the target, so
/// a reader never sees a half-written snapshot.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "queue.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn save(&self, snapshot: &QueueSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory", parent, e))?;
        }

        let json = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| io_error("write", &temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| io_error("replace", &self.path, e))?;

        debug!(
            path = %self.path.display(),
            entries = snapshot.entries.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<QueueSnapshot>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot yet");
                return Ok(None);
            }
            Err(e) => return Err(io_error("read", &self.path, e)),
        };

        let snapshot: QueueSnapshot = serde_json::from_slice(&bytes)?;
        debug!(
            path = %self.path.display(),
            entries = snapshot.entries.len(),
            "Snapshot loaded"
        );
        Ok(Some(snapshot))
    }
}
