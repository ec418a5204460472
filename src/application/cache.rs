//! Tree cache: one `TreeResult` per composite key, populated once.
//!
//! Owned by the service container and injected into services; there is no
//! process-wide singleton. `clear` is the only way to drop entries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::debug;

use crate::domain::{TreeArena, TreeKey};

/// A named tree keyed by section, wrapping the root of its arena.
#[derive(Debug)]
pub struct TreeResult {
    pub name: String,
    pub alias: String,
    pub key: TreeKey,
    tree: Mutex<TreeArena>,
}

impl TreeResult {
    pub fn new(section: &str, key: TreeKey, tree: TreeArena) -> Self {
        Self {
            name: section.to_string(),
            alias: section.to_string(),
            key,
            tree: Mutex::new(tree),
        }
    }

    /// Section this tree was fetched for.
    pub fn section(&self) -> &str {
        &self.alias
    }

    /// Exclusive access to the arena. Never hold the guard across a fetch.
    pub async fn lock(&self) -> MutexGuard<'_, TreeArena> {
        self.tree.lock().await
    }
}

type Slot = Arc<OnceCell<Arc<TreeResult>>>;

#[derive(Debug, Default)]
pub struct TreeCache {
    entries: Mutex<HashMap<TreeKey, Slot>>,
}

impl TreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tree for `key`, if one has been stored.
    pub async fn get(&self, key: &TreeKey) -> Option<Arc<TreeResult>> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Return the cached tree for `key`, or run `load` to populate it.
    ///
    /// Concurrent callers for the same key share one `load`. A failed load
    /// leaves the slot empty so a later call retries.
    pub async fn get_or_try_load<F, Fut, E>(&self, key: TreeKey, load: F) -> Result<Arc<TreeResult>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TreeResult, E>>,
    {
        let slot = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(key.clone()).or_default())
        };
        slot.get_or_try_init(|| async move {
            debug!(%key, "tree cache miss");
            load().await.map(Arc::new)
        })
        .await
        .cloned()
    }

    /// Number of populated entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every entry. In-flight loads still resolve for their callers but
    /// are not stored.
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        debug!(count = entries.len(), "clearing tree cache");
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_tree, NodePayload};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tree(key: &TreeKey) -> TreeResult {
        let arena = build_tree(NodePayload::new("-1", "Root"), "content").unwrap();
        TreeResult::new("content", key.clone(), arena)
    }

    #[tokio::test]
    async fn test_second_load_is_served_from_cache() {
        let cache = TreeCache::new();
        let key = TreeKey::new("", "content");
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_try_load(key.clone(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(tree(&key))
            })
            .await
            .unwrap();
        let second = cache
            .get_or_try_load(key.clone(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(tree(&key))
            })
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache = TreeCache::new();
        let key = TreeKey::new("", "content");

        let err = cache
            .get_or_try_load(key.clone(), || async { Err::<TreeResult, _>("offline") })
            .await
            .unwrap_err();
        assert_eq!(err, "offline");
        assert!(cache.get(&key).await.is_none());
        assert!(cache.is_empty().await);

        let loaded = cache
            .get_or_try_load(key.clone(), || async { Ok::<_, &str>(tree(&key)) })
            .await;
        assert!(loaded.is_ok());
    }

    #[tokio::test]
    async fn test_clear_drops_entries() {
        let cache = TreeCache::new();
        let key = TreeKey::new("", "content");
        cache
            .get_or_try_load(key.clone(), || async { Ok::<_, String>(tree(&key)) })
            .await
            .unwrap();

        cache.clear().await;

        assert!(cache.get(&key).await.is_none());
    }
}
