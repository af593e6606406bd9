//! Retrieval-generation chain: embed, search, prompt, complete

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};

/// Answers questions from the indexed documents
pub struct RetrievalChain {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl RetrievalChain {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            llm,
            top_k,
        }
    }

    /// Answer `question`, returning the model's completion unmodified
    pub async fn invoke(&self, question: &str) -> Result<String> {
        let start = Instant::now();

        let query_embedding = self.embedder.embed(question).await?;
        let results = self.store.search(&query_embedding, self.top_k).await?;
        tracing::debug!("Retrieved {} chunks", results.len());

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_rag_prompt(question, &context);

        let answer = self.llm.complete(&prompt).await?;

        tracing::info!(
            "Answered in {}ms using {} chunks",
            start.elapsed().as_millis(),
            results.len()
        );

        Ok(answer)
    }
}
