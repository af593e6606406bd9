//! Application state for the chat server

use std::sync::Arc;

use crate::retrieval::RetrievalChain;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    chain: Arc<RetrievalChain>,
}

impl AppState {
    pub fn new(chain: Arc<RetrievalChain>) -> Self {
        Self { chain }
    }

    /// Get the retrieval chain
    pub fn chain(&self) -> &RetrievalChain {
        &self.chain
    }
}
