//! Open an existing vector index or build one from the document source

use std::fmt;
use std::sync::Arc;

use crate::config::VectorDbConfig;
use crate::error::{Error, Result};
use crate::ingestion::{DocumentSource, TextChunker};
use crate::providers::{EmbeddingProvider, LocalVectorStore, VectorStoreProvider};
use crate::types::StoredChunk;

/// How the index came to be ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    /// Reopened from the persist directory
    Loaded,
    /// Built from scratch during this startup
    Built { documents: usize, chunks: usize },
}

impl fmt::Display for IndexOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexOrigin::Loaded => write!(f, "loaded from disk"),
            IndexOrigin::Built { documents, chunks } => {
                write!(f, "built from {} documents ({} chunks)", documents, chunks)
            }
        }
    }
}

/// Vector index bootstrap
pub struct VectorIndex;

impl VectorIndex {
    /// Reopen the index when the persist directory exists, otherwise build it.
    ///
    /// Building loads every document, chunks and embeds them, and only then
    /// creates the directory and writes the entries.
    pub async fn open_or_build(
        config: &VectorDbConfig,
        source: &dyn DocumentSource,
        chunker: &TextChunker,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<(Arc<dyn VectorStoreProvider>, IndexOrigin)> {
        let dir = config.persist_dir.as_path();

        if dir.exists() {
            tracing::info!("Loading existing vector store from {}", dir.display());
            let store = LocalVectorStore::open(dir, &config.collection)?;
            return Ok((Arc::new(store), IndexOrigin::Loaded));
        }

        tracing::info!("Creating new vector store at {}", dir.display());

        let documents = source.load_documents().await?;
        let chunks = chunker.split_documents(&documents);
        tracing::info!(
            "Split {} documents into {} chunks",
            documents.len(),
            chunks.len()
        );

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let entries: Vec<StoredChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| StoredChunk { chunk, embedding })
            .collect();
        let origin = IndexOrigin::Built {
            documents: documents.len(),
            chunks: entries.len(),
        };

        let store = LocalVectorStore::create(dir, &config.collection)?;
        if !entries.is_empty() {
            store.insert_chunks(entries).await?;
        }

        Ok((Arc::new(store), origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::MockDocumentSource;
    use crate::providers::MockEmbeddingProvider;
    use crate::types::{Document, FileType};
    use std::path::Path;

    fn config(dir: &Path) -> VectorDbConfig {
        VectorDbConfig {
            persist_dir: dir.join("vector_store"),
            ..VectorDbConfig::default()
        }
    }

    fn document(name: &str, text: &str) -> Document {
        Document::new(text.to_string(), Path::new(name), FileType::Txt)
    }

    fn embedder_returning_unit_vectors() -> MockEmbeddingProvider {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_batch()
            .returning(|texts| Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect()));
        embedder
    }

    #[tokio::test]
    async fn test_builds_when_directory_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let chunker = TextChunker::new(10, 2).unwrap();

        let mut source = MockDocumentSource::new();
        source.expect_load_documents().times(1).returning(|| {
            Ok(vec![
                document("data/a.txt", "short"),
                document("data/b.txt", "a somewhat longer text body"),
            ])
        });
        let embedder = embedder_returning_unit_vectors();

        let (store, origin) = VectorIndex::open_or_build(&config, &source, &chunker, &embedder)
            .await
            .unwrap();

        // "short" -> 1 chunk, 27 chars -> ceil(25 / 8) = 4 chunks
        assert_eq!(origin, IndexOrigin::Built { documents: 2, chunks: 5 });
        assert_eq!(store.len().await.unwrap(), 5);
        assert!(config.persist_dir.is_dir());
    }

    #[tokio::test]
    async fn test_existing_directory_skips_source() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let chunker = TextChunker::new(10, 2).unwrap();

        {
            let mut source = MockDocumentSource::new();
            source
                .expect_load_documents()
                .returning(|| Ok(vec![document("data/a.txt", "hello")]));
            let embedder = embedder_returning_unit_vectors();
            VectorIndex::open_or_build(&config, &source, &chunker, &embedder)
                .await
                .unwrap();
        }

        let mut source = MockDocumentSource::new();
        source.expect_load_documents().times(0);
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_embed_batch().times(0);

        let (store, origin) = VectorIndex::open_or_build(&config, &source, &chunker, &embedder)
            .await
            .unwrap();

        assert_eq!(origin, IndexOrigin::Loaded);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_existing_empty_directory_loads_empty_index() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let chunker = TextChunker::new(10, 2).unwrap();
        std::fs::create_dir_all(&config.persist_dir).unwrap();

        let mut source = MockDocumentSource::new();
        source.expect_load_documents().times(0);
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_embed_batch().times(0);

        let (store, origin) = VectorIndex::open_or_build(&config, &source, &chunker, &embedder)
            .await
            .unwrap();

        assert_eq!(origin, IndexOrigin::Loaded);
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_embedding_failure_leaves_no_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let chunker = TextChunker::new(10, 2).unwrap();

        let mut source = MockDocumentSource::new();
        source
            .expect_load_documents()
            .returning(|| Ok(vec![document("data/a.txt", "hello")]));
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_batch()
            .returning(|_| Err(Error::embedding("model not found")));

        let result = VectorIndex::open_or_build(&config, &source, &chunker, &embedder).await;

        assert!(matches!(result, Err(Error::Embedding(_))));
        assert!(!config.persist_dir.exists());
    }

    #[tokio::test]
    async fn test_empty_source_creates_empty_index() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let chunker = TextChunker::new(10, 2).unwrap();

        let mut source = MockDocumentSource::new();
        source.expect_load_documents().returning(|| Ok(Vec::new()));
        let embedder = embedder_returning_unit_vectors();

        let (store, origin) = VectorIndex::open_or_build(&config, &source, &chunker, &embedder)
            .await
            .unwrap();

        assert_eq!(origin, IndexOrigin::Built { documents: 0, chunks: 0 });
        assert!(store.is_empty().await.unwrap());
        assert!(config.persist_dir.is_dir());
    }
}
