mod disk;
mod key;
mod memory;

pub use disk::DiskCache;
pub use key::CacheKey;
pub use memory::MemoryCache;

use tracing::warn;

use crate::config::CacheConfig;
use crate::error::Result;

/// Combined cache with memory and disk layers.
///
/// Both layers are best-effort: a failing store degrades to a cache miss on
/// read and a dropped write, never into the translation path.
pub struct TranslationCache {
    memory: Option<MemoryCache>,
    disk: Option<DiskCache>,
}

impl TranslationCache {
    /// Create a new translation cache from configuration
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let memory = if config.memory_enabled {
            Some(MemoryCache::new(
                config.memory_max_entries,
                config.memory_ttl_seconds,
            ))
        } else {
            None
        };

        let disk = if config.disk_enabled {
            let path = config
                .disk_path
                .clone()
                .unwrap_or_else(crate::util::translation_cache_path);
            match DiskCache::new(path) {
                Ok(disk) => Some(disk),
                Err(e) => {
                    // Degrade to memory-only rather than failing service startup
                    warn!("Disk cache unavailable, continuing without it: {e}");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self { memory, disk })
    }

    /// A cache with no backing layers; every lookup misses
    pub const fn disabled() -> Self {
        Self {
            memory: None,
            disk: None,
        }
    }

    /// Get a cached translation
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        let key_str = key.as_str();

        // Try memory cache first
        if let Some(ref memory) = self.memory
            && let Some(value) = memory.get(key_str).await
        {
            return Some(value);
        }

        // Try disk cache
        if let Some(ref disk) = self.disk
            && let Some(value) = disk.get(key_str)
        {
            // Populate memory cache on disk hit
            if let Some(ref memory) = self.memory {
                memory.insert(key_str.to_string(), value.clone()).await;
            }
            return Some(value);
        }

        None
    }

    /// Store a translation in cache with the given time-to-live
    pub async fn insert(&self, key: &CacheKey, value: &str, ttl_seconds: u64) {
        let key_str = key.as_str();

        // Store in memory cache
        if let Some(ref memory) = self.memory {
            memory.insert(key_str.to_string(), value.to_string()).await;
        }

        // Store in disk cache
        if let Some(ref disk) = self.disk
            && let Err(e) = disk.insert(key_str, value, ttl_seconds)
        {
            warn!("Cache write failed for {key_str}: {e}");
        }
    }

    /// Check if a key exists in cache
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.get(key).await.is_some()
    }

    /// Clear all caches
    pub fn clear(&self) {
        if let Some(ref memory) = self.memory {
            memory.clear();
        }

        if let Some(ref disk) = self.disk
            && let Err(e) = disk.clear()
        {
            warn!("Cache clear failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lang;

    fn memory_only() -> TranslationCache {
        TranslationCache::new(&CacheConfig {
            memory_enabled: true,
            disk_enabled: false,
            ..CacheConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_roundtrip() {
        let cache = memory_only();
        let key = CacheKey::new("Hello", &Lang::new("zh"));

        assert_eq!(cache.get(&key).await, None);
        cache.insert(&key, "你好", 3600).await;
        assert_eq!(cache.get(&key).await.as_deref(), Some("你好"));
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = TranslationCache::disabled();
        let key = CacheKey::new("Hello", &Lang::new("zh"));

        cache.insert(&key, "你好", 3600).await;
        assert_eq!(cache.get(&key).await, None);
        assert!(!cache.contains(&key).await);
    }

    #[tokio::test]
    async fn test_disk_hit_populates_memory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::new(&CacheConfig {
            memory_enabled: true,
            disk_enabled: true,
            disk_path: Some(dir.path().join("db")),
            ..CacheConfig::default()
        })
        .unwrap();

        let key = CacheKey::new("Hello", &Lang::new("fr"));
        cache.disk.as_ref().unwrap().insert(key.as_str(), "Bonjour", 3600).unwrap();

        assert_eq!(cache.get(&key).await.as_deref(), Some("Bonjour"));
        assert_eq!(
            cache.memory.as_ref().unwrap().get(key.as_str()).await.as_deref(),
            Some("Bonjour")
        );
    }
}
