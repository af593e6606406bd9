//! Directory loader producing one document per supported file

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{Document, FileType};

use super::external_parser::ExternalParser;
use super::parser::FileParser;

/// Source of documents for the index builder
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load every document this source knows about
    async fn load_documents(&self) -> Result<Vec<Document>>;
}

/// Reads all supported files under a directory
pub struct DocumentLoader {
    data_dir: PathBuf,
    external_parser: ExternalParser,
}

impl DocumentLoader {
    pub fn new(data_dir: impl Into<PathBuf>, external_parser: ExternalParser) -> Self {
        Self {
            data_dir: data_dir.into(),
            external_parser,
        }
    }

    /// Supported files directly inside the data directory, sorted by name
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        if !self.data_dir.is_dir() {
            return Err(Error::Config(format!(
                "Input directory not found: {}",
                self.data_dir.display()
            )));
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(&self.data_dir)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| Error::internal(format!("Directory walk failed: {}", e)))?;
            let path = entry.path();

            if !entry.file_type().is_file() || is_hidden(path) {
                continue;
            }

            if FileType::from_path(path).is_supported() {
                files.push(path.to_path_buf());
            } else {
                tracing::debug!("Skipping unsupported file: {}", path.display());
            }
        }

        Ok(files)
    }

    /// Parse one file into a document
    pub async fn load_file(&self, path: &Path) -> Result<Document> {
        let data = tokio::fs::read(path).await?;
        let filename = path.to_string_lossy().to_string();
        let file_type = FileType::from_path(path);

        let text = if ExternalParser::needs_external_parsing(&filename) {
            self.external_parser.parse(&filename, &data).await?
        } else {
            FileParser::parse(&filename, &data)?.content
        };

        Ok(Document::new(text, path, file_type))
    }
}

#[async_trait]
impl DocumentSource for DocumentLoader {
    async fn load_documents(&self) -> Result<Vec<Document>> {
        let files = self.list_files()?;
        tracing::info!(
            "Loading {} files from {}",
            files.len(),
            self.data_dir.display()
        );

        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            tracing::info!("  Processing: {}", path.display());
            documents.push(self.load_file(&path).await?);
        }

        Ok(documents)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
