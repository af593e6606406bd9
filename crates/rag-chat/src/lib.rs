//! rag-chat: question answering over a local document folder
//!
//! Documents under a data directory are parsed, chunked and embedded with
//! Ollama into a redb-persisted vector index. `POST /chat` retrieves the most
//! similar chunks and asks the LLM to answer from them.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use retrieval::RetrievalChain;
pub use storage::{IndexOrigin, VectorIndex};
pub use types::{
    chat::{ChatResponse, ErrorResponse},
    document::{Chunk, ChunkSource, Document, FileType},
};
