//! Core types for the RAG system

pub mod chat;
pub mod document;

pub use chat::{ChatResponse, ErrorResponse};
pub use document::{Chunk, ChunkSource, Document, FileType, StoredChunk};
