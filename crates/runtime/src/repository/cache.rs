//! Read-through TTL cache for fights.

use std::collections::HashMap;
use std::time::Duration;

use fray_core::Fight;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::repository::{Collection, Result, Store, load_document, save_document};

struct Entry {
    fight: Fight,
    expires_at: Instant,
}

/// Fights keyed by id, each entry evicted `ttl` after it was last written.
///
/// Entries expire independently of the fight's lifecycle; a miss or an
/// expired entry always falls back to the store.
pub struct FightCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl FightCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached copy, if present and fresh. Expired entries are evicted.
    pub async fn get(&self, id: &str) -> Option<Fight> {
        let mut entries = self.entries.lock().await;
        match entries.get(id) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.fight.clone()),
            Some(_) => {
                entries.remove(id);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, fight: Fight) {
        let expires_at = Instant::now() + self.ttl;
        self.entries
            .lock()
            .await
            .insert(fight.id.clone(), Entry { fight, expires_at });
    }

    pub async fn invalidate(&self, id: &str) {
        self.entries.lock().await.remove(id);
    }

    /// Drops every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Cache first, then the store; a store hit is cached.
    pub async fn fetch(&self, store: &dyn Store, id: &str) -> Result<Option<Fight>> {
        if let Some(fight) = self.get(id).await {
            return Ok(Some(fight));
        }

        let fight: Option<Fight> = load_document(store, Collection::Fights, id).await?;
        if let Some(fight) = &fight {
            self.insert(fight.clone()).await;
        }
        Ok(fight)
    }

    /// Writes through to the store, then refreshes the cached copy.
    pub async fn put(&self, store: &dyn Store, fight: &Fight) -> Result<()> {
        save_document(store, Collection::Fights, fight).await?;
        self.insert(fight.clone()).await;
        Ok(())
    }

    /// Deletes from the store and the cache.
    pub async fn remove(&self, store: &dyn Store, id: &str) -> Result<()> {
        self.invalidate(id).await;
        store.delete(Collection::Fights, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn fight(id: &str) -> Fight {
        Fight::new(id, vec![vec!["a".into()], vec!["b".into()]])
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = FightCache::new(Duration::from_secs(60));
        cache.insert(fight("f1")).await;
        assert!(cache.get("f1").await.is_some());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get("f1").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn miss_falls_back_to_store() {
        let store = InMemoryStore::new();
        let cache = FightCache::new(Duration::from_secs(60));
        cache.put(&store, &fight("f1")).await.unwrap();

        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(cache.purge_expired().await, 1);

        let fetched = cache.fetch(&store, "f1").await.unwrap().unwrap();
        assert_eq!(fetched.id, "f1");
        assert!(cache.get("f1").await.is_some());
    }

    #[tokio::test]
    async fn remove_clears_both_layers() {
        let store = InMemoryStore::new();
        let cache = FightCache::new(Duration::from_secs(60));
        cache.put(&store, &fight("f1")).await.unwrap();

        cache.remove(&store, "f1").await.unwrap();
        assert!(cache.get("f1").await.is_none());
        assert!(cache.fetch(&store, "f1").await.unwrap().is_none());
    }
}
