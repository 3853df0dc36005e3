//! Typed access to untyped store documents.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{Collection, RepositoryError, Result, Store};

/// Fetches and decodes a document.
pub async fn load_document<T: DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
    id: &str,
) -> Result<Option<T>> {
    match store.fetch(collection, id).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| RepositoryError::CorruptedData(format!("{collection}/{id}: {e}"))),
        None => Ok(None),
    }
}

/// Encodes and stores a document.
pub async fn save_document<T: Serialize + Sync>(
    store: &dyn Store,
    collection: Collection,
    document: &T,
) -> Result<()> {
    store.put(collection, serde_json::to_value(document)?).await
}
