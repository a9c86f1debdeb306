//! Local filesystem object store for user media.
//!
//! Objects are plain files under a root directory, addressed by their
//! `/`-separated key:
//!
//! ```text
//! {root}/
//! └── avatars/
//!     ├── u1
//!     └── u2
//! ```

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::{CascadeTargetError, ObjectStore};

const TARGET: &str = "object_store";

/// Filesystem-backed object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a key under the root, rejecting keys that escape it.
    fn object_path(&self, key: &str) -> Result<PathBuf, CascadeTargetError> {
        let relative = Path::new(key);
        let escapes = key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(CascadeTargetError::permanent(
                TARGET,
                format!("Invalid object key: {:?}", key),
            ));
        }
        Ok(self.root.join(relative))
    }

    /// Writes an object via temp file and rename.
    pub async fn put_object(&self, key: &str, bytes: &[u8]) -> Result<(), CascadeTargetError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                CascadeTargetError::new(
                    TARGET,
                    format!("Failed to create directory {}: {}", parent.display(), e),
                )
            })?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            CascadeTargetError::new(
                TARGET,
                format!("Failed to create temp file {}: {}", temp_path.display(), e),
            )
        })?;
        file.write_all(bytes).await.map_err(|e| {
            CascadeTargetError::new(
                TARGET,
                format!("Failed to write {}: {}", temp_path.display(), e),
            )
        })?;
        file.sync_all().await.map_err(|e| {
            CascadeTargetError::new(
                TARGET,
                format!("Failed to sync {}: {}", temp_path.display(), e),
            )
        })?;

        fs::rename(&temp_path, &path).await.map_err(|e| {
            CascadeTargetError::new(
                TARGET,
                format!(
                    "Failed to rename {} to {}: {}",
                    temp_path.display(),
                    path.display(),
                    e
                ),
            )
        })
    }

    /// Returns whether an object exists.
    pub async fn exists(&self, key: &str) -> Result<bool, CascadeTargetError> {
        let path = self.object_path(key)?;
        fs::try_exists(&path).await.map_err(|e| {
            CascadeTargetError::new(
                TARGET,
                format!("Failed to stat {}: {}", path.display(), e),
            )
        })
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn delete_object(&self, key: &str) -> Result<(), CascadeTargetError> {
        let path = self.object_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key = %key, "Object deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key = %key, "Object already absent");
                Ok(())
            }
            Err(e) => Err(CascadeTargetError::new(
                TARGET,
                format!("Failed to delete {}: {}", path.display(), e),
            )),
        }
    }
}
