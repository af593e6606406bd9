//! Document ingestion: directory loading, multi-format parsing and chunking

mod chunker;
pub mod external_parser;
pub mod loader;
mod parser;

pub use chunker::TextChunker;
pub use external_parser::{ExternalParser, ExternalParserConfig};
pub use loader::{DocumentLoader, DocumentSource};
pub use parser::{FileParser, ParsedDocument};

#[cfg(test)]
pub use loader::MockDocumentSource;
