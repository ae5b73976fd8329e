//! Research Cache
//!
//! Read-through cache of research bundles keyed by a digest of `(topic, deep)`.
//! The on-disk form is a single JSON object mapping hex digests to bundles.
//! Entries never expire; each key is written once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::types::{ResearchBundle, Result};

/// Key/value store for research bundles
pub trait ResearchCache: Send + Sync {
    fn get(&self, key: &str) -> Option<ResearchBundle>;
    fn put(&self, key: &str, bundle: &ResearchBundle) -> Result<()>;
}

/// Cache key for a topic: hex SHA-256 of `"{topic}|True"` / `"{topic}|False"`
pub fn research_key(topic: &str, deep: bool) -> String {
    let flag = if deep { "True" } else { "False" };
    let digest = Sha256::digest(format!("{}|{}", topic, flag).as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

// =============================================================================
// JSON File Cache
// =============================================================================

/// Cache stored as one pretty-printed JSON object file
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole map; a missing or corrupt file reads as empty
    fn load(&self) -> HashMap<String, ResearchBundle> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    "Research cache {} is unreadable, treating as empty: {}",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }
}

impl ResearchCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<ResearchBundle> {
        let hit = self.load().remove(key);
        debug!(
            "Research cache {} for {}",
            if hit.is_some() { "hit" } else { "miss" },
            &key[..key.len().min(12)]
        );
        hit
    }

    fn put(&self, key: &str, bundle: &ResearchBundle) -> Result<()> {
        let mut map = self.load();
        map.insert(key.to_string(), bundle.clone());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }
}

// =============================================================================
// In-Memory Cache
// =============================================================================

/// Process-local cache, used in tests and when no file cache is wanted
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, ResearchBundle>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResearchCache for MemoryCache {
    fn get(&self, key: &str) -> Option<ResearchBundle> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, bundle: &ResearchBundle) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), bundle.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceDoc;
    use tempfile::TempDir;

    fn bundle() -> ResearchBundle {
        ResearchBundle {
            sources: vec![SourceDoc {
                title: "Coffee".to_string(),
                url: "https://example.com".to_string(),
                snippet: "Brew it".to_string(),
                raw_content: None,
            }],
            insights: vec!["Coffee".to_string()],
            keywords: vec!["coffee".to_string()],
        }
    }

    #[test]
    fn test_research_key_is_stable_hex() {
        let key = research_key("coffee brewing", false);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, research_key("coffee brewing", false));
        assert_ne!(key, research_key("coffee brewing", true));
    }

    #[test]
    fn test_file_cache_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cache = JsonFileCache::new(dir.path().join("nested/research_cache.json"));

        assert!(cache.get("k").is_none());
        cache.put("k", &bundle()).unwrap();
        assert_eq!(cache.get("k"), Some(bundle()));

        // A second key does not clobber the first
        cache.put("other", &ResearchBundle::default()).unwrap();
        assert_eq!(cache.get("k"), Some(bundle()));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("research_cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = JsonFileCache::new(&path);
        assert!(cache.get("k").is_none());

        cache.put("k", &bundle()).unwrap();
        assert_eq!(cache.get("k"), Some(bundle()));
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        assert!(cache.is_empty());
        cache.put("k", &bundle()).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), Some(bundle()));
    }
}
