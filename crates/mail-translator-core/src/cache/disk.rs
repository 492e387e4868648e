use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Disk-based cache using sled.
///
/// sled has no native per-entry expiry, so each value is framed with its
/// absolute expiry timestamp. Expired entries read as a miss and are removed
/// on the spot.
pub struct DiskCache {
    db: Db,
}

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    /// Unix seconds after which the entry is stale (0 = never)
    expires_at: u64,
    text: String,
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl DiskCache {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::CacheInit(format!(
                    "Failed to create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let db = sled::open(path).map_err(|e| {
            let err_str = e.to_string();
            // Detect lock errors and provide actionable fix
            if err_str.contains("WouldBlock") || err_str.contains("lock") {
                Error::CacheInit(format!(
                    "Cache locked at {}\n\n\
                    Another process is using the cache, or a previous instance crashed.\n\
                    To fix: rm {}/db/LOCK",
                    path.display(),
                    path.display()
                ))
            } else {
                Error::CacheInit(format!("Failed to open cache at {}: {}", path.display(), e))
            }
        })?;

        debug!("Opened disk cache at {}", path.display());

        Ok(Self { db })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let raw = match self.db.get(key.as_bytes()) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read error: {}", e);
                return None;
            }
        };

        let entry: StoredEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding undecodable cache entry for {key}: {e}");
                let _ = self.db.remove(key.as_bytes());
                return None;
            }
        };

        if entry.expires_at != 0 && entry.expires_at <= now_unix() {
            debug!("Cache entry for {key} expired");
            let _ = self.db.remove(key.as_bytes());
            return None;
        }

        Some(entry.text)
    }

    pub fn insert(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let entry = StoredEntry {
            expires_at: if ttl_seconds == 0 { 0 } else { now_unix() + ttl_seconds },
            text: value.to_string(),
        };
        let raw = serde_json::to_vec(&entry).map_err(|e| Error::CacheWrite(e.to_string()))?;

        self.db
            .insert(key.as_bytes(), raw)
            .map_err(|e| Error::CacheWrite(e.to_string()))?;

        // Flush to ensure persistence
        self.db
            .flush()
            .map_err(|e| Error::CacheWrite(format!("Flush failed: {e}")))?;

        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| Error::CacheWrite(e.to_string()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.db.clear().map_err(|e| Error::CacheWrite(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| Error::CacheWrite(format!("Flush failed: {e}")))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache() -> (tempfile::TempDir, DiskCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path().join("db")).unwrap();
        (dir, cache)
    }

    #[test]
    fn test_insert_and_get() {
        let (_dir, cache) = temp_cache();
        cache.insert("k", "translated", 3600).unwrap();
        assert_eq!(cache.get("k").as_deref(), Some("translated"));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_expired_entry_reads_as_miss() {
        let (_dir, cache) = temp_cache();
        // Write an already-expired entry directly
        let entry = StoredEntry {
            expires_at: 1,
            text: "stale".to_string(),
        };
        cache
            .db
            .insert("k".as_bytes(), serde_json::to_vec(&entry).unwrap())
            .unwrap();

        assert_eq!(cache.get("k"), None);
        // And the stale entry is gone
        assert!(cache.db.get("k".as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let (_dir, cache) = temp_cache();
        cache.insert("k", "forever", 0).unwrap();
        assert_eq!(cache.get("k").as_deref(), Some("forever"));
    }

    #[test]
    fn test_undecodable_entry_is_discarded() {
        let (_dir, cache) = temp_cache();
        cache.db.insert("k".as_bytes(), &b"not json"[..]).unwrap();
        assert_eq!(cache.get("k"), None);
    }
}
