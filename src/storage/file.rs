//! File-backed storage backend.
//!
//! Each key lives in its own file under a root directory. File names are the
//! SHA-256 digest of the key, so keys of any length map to a short valid file
//! name. The key itself is stored next to the value inside the file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::storage::Storage;

const FILE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// On-disk shape of one stored item.
#[derive(Debug, Serialize, Deserialize)]
struct StoredItem {
    key: String,
    value: String,
}

// == File Storage ==
/// Storage that survives process restarts.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    // == Constructor ==
    /// Opens (and creates if needed) a storage directory at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "file storage opened");
        Ok(Self { root })
    }

    /// Directory holding the stored items.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(file_name_for(key)))
    }

    /// Unique sibling path a write is staged in before being renamed over `path`.
    fn temp_path_for(&self, path: &Path) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(format!(".{}.{}.{}", std::process::id(), seq, TEMP_EXTENSION));
        path.with_file_name(name)
    }

    async fn read_item(path: &Path) -> Result<Option<StoredItem>> {
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn file_name_for(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{}.{}", hex::encode(hasher.finalize()), FILE_EXTENSION)
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match Self::read_item(&path).await? {
            Some(item) if item.key == key => Ok(Some(item.value)),
            Some(item) => {
                warn!(key, stored = item.key.as_str(), "stored key mismatch, treating as absent");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let contents = serde_json::to_string(&StoredItem {
            key: key.to_string(),
            value: value.to_string(),
        })?;

        // Readers only ever see a complete file: stage then rename.
        let temp = self.temp_path_for(&path);
        if let Err(err) = fs::write(&temp, contents).await {
            let _ = fs::remove_file(&temp).await;
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            match Self::read_item(&path).await {
                Ok(Some(item)) => keys.push(item.key),
                Ok(None) => {}
                Err(err) => debug!(path = %path.display(), error = %err, "skipping unreadable file"),
            }
        }
        Ok(keys)
    }
}
