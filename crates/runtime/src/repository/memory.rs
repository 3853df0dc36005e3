//! In-memory Store implementation for tests and local runs.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::repository::{Collection, Result, Store, document_id};

/// In-memory implementation of [`Store`].
///
/// Documents are kept per collection in id order, so scans are
/// deterministic.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, BTreeMap<String, Value>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn fetch(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn put(&self, collection: Collection, document: Value) -> Result<()> {
        let id = document_id(collection, &document)?;
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().insert(id, document);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(documents) = collections.get_mut(&collection) {
            documents.remove(id);
        }
        Ok(())
    }

    fn scan(&self, collection: Collection) -> BoxStream<'_, Result<Value>> {
        // Snapshot on first poll; later writes do not affect a running scan.
        stream::once(async move {
            let collections = self.collections.read().await;
            let documents: Vec<Value> = collections
                .get(&collection)
                .map(|documents| documents.values().cloned().collect())
                .unwrap_or_default();
            stream::iter(documents.into_iter().map(Ok))
        })
        .flatten()
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn put_fetch_delete() {
        let store = InMemoryStore::new();
        store
            .put(Collection::Creatures, json!({"id": "ada", "name": "Ada"}))
            .await
            .unwrap();

        let doc = store.fetch(Collection::Creatures, "ada").await.unwrap();
        assert_eq!(doc.unwrap()["name"], "Ada");
        assert!(
            store
                .fetch(Collection::Fights, "ada")
                .await
                .unwrap()
                .is_none()
        );

        store.delete(Collection::Creatures, "ada").await.unwrap();
        store.delete(Collection::Creatures, "ada").await.unwrap();
        assert_eq!(store.len(Collection::Creatures).await, 0);
    }

    #[tokio::test]
    async fn documents_without_id_are_rejected() {
        let store = InMemoryStore::new();
        let err = store
            .put(Collection::Creatures, json!({"name": "nobody"}))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::RepositoryError::MissingId { .. }));
    }

    #[tokio::test]
    async fn scan_streams_in_id_order() {
        let store = InMemoryStore::new();
        for id in ["c", "a", "b"] {
            store
                .put(Collection::Creatures, json!({ "id": id }))
                .await
                .unwrap();
        }

        let ids: Vec<String> = store
            .scan(Collection::Creatures)
            .map_ok(|doc| doc["id"].as_str().unwrap_or_default().to_owned())
            .try_collect()
            .await
            .unwrap();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
