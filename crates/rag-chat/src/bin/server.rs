//! Chat server binary
//!
//! Run with: cargo run -p rag-chat --bin rag-chat-server -- --config rag-chat.toml

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use rag_chat::{
    config::RagConfig,
    ingestion::{DocumentLoader, ExternalParser, TextChunker},
    providers::{EmbeddingProvider, LlmProvider, OllamaProvider, VectorStoreProvider},
    server::{state::AppState, RagServer},
    RetrievalChain, VectorIndex,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rag-chat-server")]
#[command(about = "Answer questions about a folder of documents", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         RAG Chat                          ║
║             Ask questions about your documents            ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = RagConfig::discover(args.config.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Data directory: {}", config.ingestion.data_dir.display());
    tracing::info!("  - Vector store: {}", config.vector_db.persist_dir.display());
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let (embedder, llm) = OllamaProvider::new(&config.llm)?.split();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(embedder);
    let llm: Arc<dyn LlmProvider> = Arc::new(llm);
    tracing::info!(
        "Providers: embeddings via {}, generation via {} ({})",
        embedder.name(),
        llm.name(),
        llm.model()
    );

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    if llm.health_check().await.unwrap_or(false) {
        tracing::info!("Ollama is running");
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!("  2. Pull model: ollama pull {}", config.llm.generate_model);
    }

    let external_parser = ExternalParser::new(config.external_parser.clone())?;
    let loader = DocumentLoader::new(config.ingestion.data_dir.clone(), external_parser);
    let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;

    let (store, origin) =
        VectorIndex::open_or_build(&config.vector_db, &loader, &chunker, embedder.as_ref()).await?;
    tracing::info!("Vector store ready: {} ({})", origin, store.name());

    let chain = RetrievalChain::new(embedder, store, llm, config.vector_db.top_k);
    let server = RagServer::new(config.server.clone(), AppState::new(Arc::new(chain)));

    println!("\nServer starting...");
    println!("  Chat: POST http://{}/chat", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
