//! Question answering over the vector index

mod chain;

pub use chain::RetrievalChain;
