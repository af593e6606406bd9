//! Provider abstractions for embeddings, generation and vector storage
//!
//! The chain and the index builder only see these traits; Ollama and the
//! local redb-backed store are the shipped implementations.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use local::LocalVectorStore;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
pub use vector_store::{VectorSearchResult, VectorStoreProvider};

#[cfg(test)]
pub use embedding::MockEmbeddingProvider;
#[cfg(test)]
pub use llm::MockLlmProvider;
#[cfg(test)]
pub use vector_store::MockVectorStoreProvider;
