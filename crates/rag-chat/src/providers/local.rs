//! Local vector store persisted with redb
//!
//! Entries are written once into a redb table named after the collection and
//! mirrored in memory, where search is an exhaustive cosine scan.

use async_trait::async_trait;
use parking_lot::RwLock;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::StoredChunk;

use super::vector_store::{VectorSearchResult, VectorStoreProvider};

/// File name of the database inside the persist directory
pub const INDEX_FILE: &str = "index.redb";

/// Local vector store
pub struct LocalVectorStore {
    db: Arc<Database>,
    collection: String,
    entries: Arc<RwLock<Vec<StoredChunk>>>,
}

impl LocalVectorStore {
    /// Create a fresh store inside `dir`, creating the directory
    pub fn create(dir: &Path, collection: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let db = Self::open_database(dir, collection)?;

        Ok(Self {
            db: Arc::new(db),
            collection: collection.to_string(),
            entries: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Reopen the store in `dir`
    ///
    /// A directory without a database file or without the collection table
    /// opens as an empty store.
    pub fn open(dir: &Path, collection: &str) -> Result<Self> {
        if !dir.join(INDEX_FILE).exists() {
            tracing::warn!(
                "No {} in {}, starting with an empty collection",
                INDEX_FILE,
                dir.display()
            );
        }

        let db = Self::open_database(dir, collection)?;
        let entries = Self::read_entries(&db, collection)?;

        tracing::info!(
            "Opened collection '{}' with {} entries",
            collection,
            entries.len()
        );

        Ok(Self {
            db: Arc::new(db),
            collection: collection.to_string(),
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    fn open_database(dir: &Path, collection: &str) -> Result<Database> {
        let db = Database::create(dir.join(INDEX_FILE)).map_err(redb::Error::from)?;

        // Opening the table in a write transaction creates it when missing
        let txn = db.begin_write().map_err(redb::Error::from)?;
        txn.open_table(Self::table(collection))
            .map_err(redb::Error::from)?;
        txn.commit().map_err(redb::Error::from)?;

        Ok(db)
    }

    fn table(collection: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
        TableDefinition::new(collection)
    }

    fn read_entries(db: &Database, collection: &str) -> Result<Vec<StoredChunk>> {
        let txn = db.begin_read().map_err(redb::Error::from)?;
        let table = txn
            .open_table(Self::table(collection))
            .map_err(redb::Error::from)?;

        let mut entries = Vec::new();
        for item in table.iter().map_err(redb::Error::from)? {
            let (_, value) = item.map_err(redb::Error::from)?;
            entries.push(serde_json::from_slice::<StoredChunk>(value.value())?);
        }

        entries.sort_by(|a, b| {
            (&a.chunk.source.source, a.chunk.chunk_index)
                .cmp(&(&b.chunk.source.source, b.chunk.chunk_index))
        });

        Ok(entries)
    }

    fn write_entries(db: &Database, collection: &str, entries: &[StoredChunk]) -> Result<()> {
        let txn = db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = txn
                .open_table(Self::table(collection))
                .map_err(redb::Error::from)?;

            for entry in entries {
                let key = entry.chunk.id.to_string();
                let value = serde_json::to_vec(entry)?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(redb::Error::from)?;
            }
        }
        txn.commit().map_err(redb::Error::from)?;
        Ok(())
    }
}

/// Cosine similarity; zero when either vector has no magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn insert_chunks(&self, entries: Vec<StoredChunk>) -> Result<()> {
        if let Some(empty) = entries.iter().find(|e| e.embedding.is_empty()) {
            return Err(Error::vector_db(format!(
                "Chunk {} has no embedding",
                empty.chunk.id
            )));
        }

        let db = Arc::clone(&self.db);
        let collection = self.collection.clone();
        let store = Arc::clone(&self.entries);

        tokio::task::spawn_blocking(move || {
            Self::write_entries(&db, &collection, &entries)?;
            store.write().extend(entries);
            Ok(())
        })
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
        let entries = self.entries.read();

        if let Some(entry) = entries.first() {
            if entry.embedding.len() != query_embedding.len() {
                return Err(Error::vector_db(format!(
                    "Query has {} dimensions, index has {}",
                    query_embedding.len(),
                    entry.embedding.len()
                )));
            }
        }

        let mut results: Vec<VectorSearchResult> = entries
            .iter()
            .map(|entry| VectorSearchResult {
                chunk: entry.chunk.clone(),
                similarity: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    fn name(&self) -> &str {
        "local-redb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkSource};

    fn entry(content: &str, index: u32, embedding: Vec<f32>) -> StoredChunk {
        StoredChunk {
            chunk: Chunk::new(
                content.to_string(),
                ChunkSource {
                    source: "data/doc.txt".to_string(),
                    file_name: "doc.txt".to_string(),
                },
                index,
            ),
            embedding,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::create(&dir.path().join("idx"), "collection1").unwrap();

        store
            .insert_chunks(vec![
                entry("east", 0, vec![1.0, 0.0]),
                entry("north", 1, vec![0.0, 1.0]),
                entry("north-east", 2, vec![0.7, 0.7]),
            ])
            .await
            .unwrap();

        let results = store.search(&[0.0, 1.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "north");
        assert_eq!(results[1].chunk.content, "north-east");
        assert!(results[0].similarity >= results[1].similarity);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx");

        {
            let store = LocalVectorStore::create(&path, "collection1").unwrap();
            store
                .insert_chunks(vec![entry("a", 0, vec![1.0, 0.0]), entry("b", 1, vec![0.0, 1.0])])
                .await
                .unwrap();
        }

        let reopened = LocalVectorStore::open(&path, "collection1").unwrap();
        assert_eq!(reopened.len().await.unwrap(), 2);
        let results = reopened.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results[0].chunk.content, "a");
        assert_eq!(results[0].chunk.source.file_name, "doc.txt");
    }

    #[tokio::test]
    async fn test_empty_collection_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx");
        drop(LocalVectorStore::create(&path, "collection1").unwrap());

        let reopened = LocalVectorStore::open(&path, "collection1").unwrap();
        assert!(reopened.is_empty().await.unwrap());
        assert!(reopened.search(&[1.0], 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_missing_embedding_and_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::create(dir.path(), "collection1").unwrap();

        assert!(store.insert_chunks(vec![entry("x", 0, vec![])]).await.is_err());

        store.insert_chunks(vec![entry("y", 0, vec![1.0, 0.0])]).await.unwrap();
        assert!(store.search(&[1.0, 0.0, 0.0], 1).await.is_err());
    }

    #[tokio::test]
    async fn test_open_directory_without_index_is_empty() {
        let dir = tempfile::tempdir().unwrap();

        let store = LocalVectorStore::open(dir.path(), "collection1").unwrap();
        assert!(store.is_empty().await.unwrap());
        assert!(dir.path().join(INDEX_FILE).exists());

        store.insert_chunks(vec![entry("z", 0, vec![1.0])]).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_open_other_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LocalVectorStore::create(dir.path(), "collection1").unwrap();
            store.insert_chunks(vec![entry("a", 0, vec![1.0])]).await.unwrap();
        }

        let other = LocalVectorStore::open(dir.path(), "collection2").unwrap();
        assert!(other.is_empty().await.unwrap());
    }
}
