//! Local vector store
//!
//! Collections live in memory. A store opened on a directory also persists
//! every collection as `<dir>/<name>.json`; each mutation rewrites that file
//! through a temporary file and a rename, so a crash never leaves a torn
//! snapshot behind.
//!
//! Search is exhaustive, ranking records by squared Euclidean distance. Ties
//! keep insertion order.

use crate::{
    Collection, GetRequest, Include, Match, Metadata, QueryRequest, StoredRecord, VectorStore,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::fs;
use tokio::sync::Mutex;
use zmem_core::{Error, Result};

const MAX_COLLECTION_NAME_LEN: usize = 63;

/// Check that a collection name is usable as a file stem
pub fn validate_collection_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Collection name cannot be empty."));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    let starts_alphanumeric = name.starts_with(|c: char| c.is_ascii_alphanumeric());

    if name.len() > MAX_COLLECTION_NAME_LEN || !valid_chars || !starts_alphanumeric {
        return Err(Error::validation(format!(
            "Invalid collection name '{}': use at most {} ASCII letters, digits, '.', '_' or '-', starting with a letter or digit",
            name, MAX_COLLECTION_NAME_LEN
        )));
    }

    Ok(())
}

/// On-disk layout of one collection
#[derive(Serialize, Deserialize)]
struct CollectionFile {
    name: String,
    records: Vec<StoredRecord>,
}

/// Guards one collection file. Shared by every handle ever created under the
/// same name, so a delete and a recreate never interleave their file writes.
type FileLock = Arc<Mutex<()>>;

/// In-memory vector store with optional JSON persistence
pub struct LocalVectorStore {
    root: Option<PathBuf>,
    collections: RwLock<HashMap<String, Arc<LocalCollection>>>,
    file_locks: RwLock<HashMap<String, FileLock>>,
}

impl LocalVectorStore {
    /// Store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            root: None,
            collections: RwLock::new(HashMap::new()),
            file_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Open (or create) a persistent store rooted at `dir`
    ///
    /// Every `<name>.json` file in the directory is loaded as a collection.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| Error::store(format!("Failed to create {:?}: {}", root, e)))?;

        let mut collections = HashMap::new();
        let mut file_locks = HashMap::new();
        let mut entries = fs::read_dir(&root)
            .await
            .map_err(|e| Error::store(format!("Failed to read {:?}: {}", root, e)))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::store(format!("Failed to read {:?}: {}", root, e)))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_collection_name(stem).is_ok()
            {
                let contents = fs::read_to_string(&path)
                    .await
                    .map_err(|e| Error::store(format!("Failed to read {:?}: {}", path, e)))?;
                let file: CollectionFile = serde_json::from_str(&contents)
                    .map_err(|e| Error::store(format!("Corrupt collection file {:?}: {}", path, e)))?;

                tracing::debug!(
                    collection = %stem,
                    records = file.records.len(),
                    "Loaded collection from disk"
                );

                let file_lock = FileLock::default();
                let collection =
                    LocalCollection::new(stem.to_string(), Some(path.clone()), file_lock.clone());
                *collection.records.write().map_err(poisoned)? = file.records;
                collections.insert(stem.to_string(), Arc::new(collection));
                file_locks.insert(stem.to_string(), file_lock);
            }
        }

        tracing::info!(path = ?root, collections = collections.len(), "Opened local vector store");

        Ok(Self {
            root: Some(root),
            collections: RwLock::new(collections),
            file_locks: RwLock::new(file_locks),
        })
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(format!("{}.json", name)))
    }

    fn file_lock(&self, name: &str) -> Result<FileLock> {
        if let Some(lock) = self.file_locks.read().map_err(poisoned)?.get(name) {
            return Ok(lock.clone());
        }
        let mut locks = self.file_locks.write().map_err(poisoned)?;
        Ok(locks.entry(name.to_string()).or_default().clone())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::store("Vector store lock poisoned")
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn get_or_create_collection(&self, name: &str) -> Result<Arc<dyn Collection>> {
        validate_collection_name(name)?;

        let file_lock = self.file_lock(name)?;
        let (collection, created) = {
            let mut collections = self.collections.write().map_err(poisoned)?;
            match collections.get(name) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let collection = Arc::new(LocalCollection::new(
                        name.to_string(),
                        self.path_for(name),
                        file_lock,
                    ));
                    collections.insert(name.to_string(), collection.clone());
                    (collection, true)
                }
            }
        };

        if created {
            tracing::info!(collection = %name, "Created collection");
            collection.persist().await?;
        }

        Ok(collection)
    }

    async fn get_collection(&self, name: &str) -> Result<Option<Arc<dyn Collection>>> {
        let collections = self.collections.read().map_err(poisoned)?;
        Ok(collections
            .get(name)
            .map(|c| c.clone() as Arc<dyn Collection>))
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        // Held until the file is gone; a collection recreated meanwhile
        // persists only after that.
        let file_lock = self.file_lock(name)?;
        let _guard = file_lock.lock().await;

        let removed = self.collections.write().map_err(poisoned)?.remove(name);

        let Some(collection) = removed else {
            return Err(Error::not_found(format!(
                "Collection '{}' does not exist.",
                name
            )));
        };

        collection.drop_storage().await?;
        tracing::info!(collection = %name, "Deleted collection");
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().map_err(poisoned)?;
        Ok(collections.keys().cloned().collect())
    }
}

/// One collection of [`LocalVectorStore`]
struct LocalCollection {
    name: String,
    path: Option<PathBuf>,
    records: RwLock<Vec<StoredRecord>>,
    /// Serializes snapshot writes so the file never goes backwards
    file_lock: FileLock,
    dropped: AtomicBool,
}

impl LocalCollection {
    fn new(name: String, path: Option<PathBuf>, file_lock: FileLock) -> Self {
        Self {
            name,
            path,
            records: RwLock::new(Vec::new()),
            file_lock,
            dropped: AtomicBool::new(false),
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.dropped.load(Ordering::SeqCst) {
            return Err(Error::not_found(format!(
                "Collection '{}' does not exist.",
                self.name
            )));
        }
        Ok(())
    }

    /// Write the current records to disk
    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self.file_lock.lock().await;
        if self.dropped.load(Ordering::SeqCst) {
            return Ok(());
        }

        let snapshot = CollectionFile {
            name: self.name.clone(),
            records: self.records.read().map_err(poisoned)?.clone(),
        };
        let json = serde_json::to_vec(&snapshot)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| Error::store(format!("Failed to write {:?}: {}", tmp_path, e)))?;
        fs::rename(&tmp_path, path)
            .await
            .map_err(|e| Error::store(format!("Failed to replace {:?}: {}", path, e)))?;

        Ok(())
    }

    /// Mark the collection dropped and remove its file.
    ///
    /// The caller must hold `file_lock`.
    async fn drop_storage(&self) -> Result<()> {
        self.dropped.store(true, Ordering::SeqCst);
        self.records.write().map_err(poisoned)?.clear();

        if let Some(path) = &self.path
            && fs::try_exists(path).await.unwrap_or(false)
        {
            fs::remove_file(path)
                .await
                .map_err(|e| Error::store(format!("Failed to remove {:?}: {}", path, e)))?;
        }
        Ok(())
    }

    fn dimension_of(records: &[StoredRecord]) -> Option<usize> {
        records.first().map(|r| r.embedding.len())
    }

    fn check_dimension(&self, expected: Option<usize>, embedding: &[f32]) -> Result<()> {
        if embedding.is_empty() {
            return Err(Error::store("Embeddings cannot be empty"));
        }
        match expected {
            Some(dim) if dim != embedding.len() => Err(Error::store(format!(
                "Embedding dimension {} does not match collection '{}' dimension {}",
                embedding.len(),
                self.name,
                dim
            ))),
            _ => Ok(()),
        }
    }

    fn project(record: &StoredRecord, include: Include, distance: Option<f32>) -> Match {
        Match {
            id: record.id.clone(),
            metadata: include.metadatas.then(|| record.metadata.clone()),
            embedding: include.embeddings.then(|| record.embedding.clone()),
            distance: if include.distances { distance } else { None },
        }
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[async_trait]
impl Collection for LocalCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, records: Vec<StoredRecord>) -> Result<()> {
        self.ensure_live()?;
        if records.is_empty() {
            return Ok(());
        }

        {
            let mut stored = self.records.write().map_err(poisoned)?;
            let mut dimension = Self::dimension_of(&stored);

            for record in &records {
                if record.id.is_empty() {
                    return Err(Error::store("Record ids cannot be empty"));
                }
                self.check_dimension(dimension, &record.embedding)?;
                dimension = Some(record.embedding.len());
            }

            for record in records {
                match stored.iter_mut().find(|r| r.id == record.id) {
                    Some(existing) => *existing = record,
                    None => stored.push(record),
                }
            }
        }

        self.persist().await
    }

    async fn update(
        &self,
        id: &str,
        embedding: Option<Vec<f32>>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        self.ensure_live()?;

        {
            let mut stored = self.records.write().map_err(poisoned)?;
            if let Some(embedding) = &embedding {
                let dimension = if stored.len() > 1 {
                    Self::dimension_of(&stored)
                } else {
                    None
                };
                self.check_dimension(dimension, embedding)?;
            }

            let record = stored.iter_mut().find(|r| r.id == id).ok_or_else(|| {
                Error::not_found(format!(
                    "Document with ID '{}' not found in collection '{}'.",
                    id, self.name
                ))
            })?;

            if let Some(embedding) = embedding {
                record.embedding = embedding;
            }
            if let Some(metadata) = metadata {
                record.metadata = metadata;
            }
        }

        self.persist().await
    }

    async fn query(&self, request: QueryRequest) -> Result<Vec<Match>> {
        self.ensure_live()?;
        if request.top_k == 0 {
            return Ok(Vec::new());
        }

        let stored = self.records.read().map_err(poisoned)?;
        self.check_dimension(Self::dimension_of(&stored), &request.embedding)?;

        let mut scored: Vec<(f32, &StoredRecord)> = stored
            .iter()
            .filter(|r| {
                request
                    .filter
                    .as_ref()
                    .is_none_or(|f| f.matches(&r.metadata))
            })
            .map(|r| (squared_l2(&request.embedding, &r.embedding), r))
            .collect();

        // Stable sort keeps insertion order between equal distances
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(scored
            .into_iter()
            .take(request.top_k)
            .map(|(distance, record)| Self::project(record, request.include, Some(distance)))
            .collect())
    }

    async fn get(&self, request: GetRequest) -> Result<Vec<Match>> {
        self.ensure_live()?;

        let stored = self.records.read().map_err(poisoned)?;
        let matches = stored
            .iter()
            .filter(|r| {
                request
                    .ids
                    .as_ref()
                    .is_none_or(|ids| ids.iter().any(|id| id == &r.id))
            })
            .map(|r| Self::project(r, request.include, None))
            .collect();

        Ok(matches)
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        self.ensure_live()?;

        let removed = {
            let mut stored = self.records.write().map_err(poisoned)?;
            let before = stored.len();
            stored.retain(|r| !ids.contains(&r.id));
            before - stored.len()
        };

        if removed > 0 {
            self.persist().await?;
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        self.ensure_live()?;
        Ok(self.records.read().map_err(poisoned)?.len())
    }
}
