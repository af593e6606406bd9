//! Document and chunk types with source tracking

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Old Microsoft Word document (.doc) - requires LibreOffice or the hosted parser
    Doc,
    /// Excel spreadsheet (.xlsx)
    Xlsx,
    /// Old Excel spreadsheet (.xls)
    Xls,
    /// CSV file
    Csv,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// HTML document
    Html,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "xlsx" => Self::Xlsx,
            "xls" => Self::Xls,
            "csv" => Self::Csv,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a path's extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .map(|ext| Self::from_extension(&ext.to_string_lossy()))
            .unwrap_or(Self::Unknown)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// A document loaded from the input directory
///
/// Lives only until it has been chunked.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Extracted text content
    pub text: String,
    /// Path the document was read from
    pub source: String,
    /// Base name of the source path
    pub file_name: String,
    /// File type
    pub file_type: FileType,
}

impl Document {
    /// Create a document, deriving the file name from the source path
    pub fn new(text: String, source: &Path, file_type: FileType) -> Self {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            text,
            source: source.to_string_lossy().to_string(),
            file_name,
            file_type,
        }
    }
}

/// Source information carried by every chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Path of the originating document
    pub source: String,
    /// Base name of the originating document
    pub file_name: String,
}

impl From<&Document> for ChunkSource {
    fn from(doc: &Document) -> Self {
        Self {
            source: doc.source.clone(),
            file_name: doc.file_name.clone(),
        }
    }
}

/// A chunk of text from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Inherited source metadata
    pub source: ChunkSource,
    /// Position of this chunk within its document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: String, source: ChunkSource, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            source,
            chunk_index,
        }
    }
}

/// A chunk together with its embedding, as persisted in the vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// The chunk
    pub chunk: Chunk,
    /// Embedding vector
    pub embedding: Vec<f32>,
}
