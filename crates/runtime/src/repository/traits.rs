//! Store contract for persisted documents.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use super::Result;

/// Document collections the runtime persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Creatures,
    Fights,
}

impl Collection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Creatures => "creatures",
            Self::Fights => "fights",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document store for DYNAMIC data: creature records and fights.
///
/// Documents are JSON objects keyed by their string `id` field. The store is
/// the system of record; every cache in the runtime sits in front of it.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch a document, `None` when the id is unknown.
    async fn fetch(&self, collection: Collection, id: &str) -> Result<Option<Value>>;

    /// Insert or replace a document under its `id` field.
    async fn put(&self, collection: Collection, document: Value) -> Result<()>;

    /// Remove a document. Deleting an unknown id is not an error.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    /// Lazily stream every document of a collection.
    fn scan(&self, collection: Collection) -> BoxStream<'_, Result<Value>>;
}

/// Reads the `id` field every document must carry.
pub fn document_id(collection: Collection, document: &Value) -> Result<String> {
    document
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| super::RepositoryError::MissingId {
            collection: collection.to_string(),
        })
}
