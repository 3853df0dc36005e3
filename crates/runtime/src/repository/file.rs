//! File-based Store implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use tokio::fs;

use crate::repository::{Collection, RepositoryError, Result, Store, document_id};

/// File-based implementation of [`Store`].
///
/// # File Format
///
/// One pretty-printed JSON file per document:
///
/// ```text
/// {base_dir}/
///   ├── creatures/
///   │   ├── {id}.json
///   │   └── ...
///   └── fights/
///       └── {id}.json
/// ```
///
/// Writes go to a temp file first and are renamed into place.
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a file store rooted at `base_dir`, creating the collection
    /// directories.
    pub async fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        for collection in [Collection::Creatures, Collection::Fights] {
            fs::create_dir_all(base_dir.join(collection.as_str())).await?;
        }
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.base_dir.join(collection.as_str())
    }

    /// Get the path to a document file.
    fn document_path(&self, collection: Collection, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(RepositoryError::CorruptedData(format!(
                "id `{id}` cannot be used as a file name"
            )));
        }
        Ok(self.collection_dir(collection).join(format!("{id}.json")))
    }
}

async fn read_document(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

enum Cursor {
    Pending(PathBuf),
    Open(fs::ReadDir),
    Done,
}

#[async_trait]
impl Store for JsonFileStore {
    async fn fetch(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let path = self.document_path(collection, id)?;

        if !fs::try_exists(&path).await? {
            return Ok(None);
        }

        let document = read_document(&path).await?;
        tracing::debug!(
            target: "runtime::repository",
            collection = %collection,
            id,
            "Loaded document from {}",
            path.display()
        );
        Ok(Some(document))
    }

    async fn put(&self, collection: Collection, document: Value) -> Result<()> {
        let id = document_id(collection, &document)?;
        let path = self.document_path(collection, &id)?;
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(&document)?;
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!(
            target: "runtime::repository",
            collection = %collection,
            id = %id,
            "Saved document to {}",
            path.display()
        );
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let path = self.document_path(collection, id)?;

        if fs::try_exists(&path).await? {
            fs::remove_file(&path).await?;
            tracing::debug!(target: "runtime::repository", collection = %collection, id, "Deleted document");
        }

        Ok(())
    }

    fn scan(&self, collection: Collection) -> BoxStream<'_, Result<Value>> {
        let dir = self.collection_dir(collection);

        stream::unfold(Cursor::Pending(dir), |mut cursor| async move {
            loop {
                match cursor {
                    Cursor::Pending(dir) => match fs::read_dir(&dir).await {
                        Ok(entries) => cursor = Cursor::Open(entries),
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
                        Err(e) => return Some((Err(e.into()), Cursor::Done)),
                    },
                    Cursor::Open(mut entries) => {
                        let entry = match entries.next_entry().await {
                            Ok(Some(entry)) => entry,
                            Ok(None) => return None,
                            Err(e) => return Some((Err(e.into()), Cursor::Done)),
                        };
                        let path = entry.path();
                        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                            cursor = Cursor::Open(entries);
                            continue;
                        }
                        return Some((read_document(&path).await, Cursor::Open(entries)));
                    }
                    Cursor::Done => return None,
                }
            }
        })
        .boxed()
    }
}
