//! Fixed-window text chunking with overlap

use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkSource, Document};

/// Splits text into character windows of `chunk_size`, consecutive windows
/// sharing `overlap` characters
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Window size in characters
    chunk_size: usize,
    /// Overlap between windows
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker; the overlap must be smaller than the window
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(Error::Config(format!(
                "invalid chunking: size {} overlap {}",
                chunk_size, overlap
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Split raw text into windows
    ///
    /// The last window ends exactly at the end of the text, so a text of
    /// `L > overlap` characters yields `ceil((L - overlap) / (size - overlap))`
    /// windows.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.overlap;
        let mut windows = Vec::new();
        let mut start = 0usize;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            windows.push(chars[start..end].iter().collect());

            if end == chars.len() {
                break;
            }
            start += step;
        }

        windows
    }

    /// Chunk a single document; chunks inherit its source metadata
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let source = ChunkSource::from(doc);

        self.split_text(&doc.text)
            .into_iter()
            .enumerate()
            .map(|(i, content)| Chunk::new(content, source.clone(), i as u32))
            .collect()
    }

    /// Chunk a batch of documents in order
    pub fn split_documents(&self, docs: &[Document]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = docs.iter().flat_map(|d| self.chunk_document(d)).collect();

        tracing::debug!(
            "Chunked {} documents into {} chunks (size: {}, overlap: {})",
            docs.len(),
            chunks.len(),
            self.chunk_size,
            self.overlap
        );

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileType;
    use std::path::Path;

    fn expected_count(len: usize, size: usize, overlap: usize) -> usize {
        (len - overlap).div_ceil(size - overlap)
    }

    #[test]
    fn test_chunk_count_matches_formula() {
        let cases = [
            (1000, 300, 50),
            (1001, 300, 50),
            (250, 300, 50),
            (300, 300, 50),
            (301, 300, 50),
            (550, 300, 50),
            (551, 300, 50),
            (5000, 1500, 200),
            (100, 10, 0),
        ];

        for (len, size, overlap) in cases {
            let chunker = TextChunker::new(size, overlap).unwrap();
            let text = "x".repeat(len);
            assert_eq!(
                chunker.split_text(&text).len(),
                expected_count(len, size, overlap),
                "len={} size={} overlap={}",
                len,
                size,
                overlap
            );
        }
    }

    #[test]
    fn test_windows_overlap_and_cover_text() {
        let chunker = TextChunker::new(10, 3).unwrap();
        let text: String = ('a'..='z').collect();
        let windows = chunker.split_text(&text);

        assert_eq!(windows[0], "abcdefghij");
        assert_eq!(windows[1], "hijklmnopq");
        for pair in windows.windows(2) {
            let tail: String = pair[0].chars().rev().take(3).collect::<Vec<_>>().into_iter().rev().collect();
            assert!(pair[1].starts_with(&tail));
        }
        assert!(windows.last().unwrap().ends_with('z'));
    }

    #[test]
    fn test_short_and_empty_text() {
        let chunker = TextChunker::new(100, 20).unwrap();
        assert!(chunker.split_text("").is_empty());
        assert_eq!(chunker.split_text("tiny"), vec!["tiny".to_string()]);
    }

    #[test]
    fn test_multibyte_characters_counted_as_chars() {
        let chunker = TextChunker::new(4, 1).unwrap();
        let windows = chunker.split_text("äöüßéèà");
        assert_eq!(windows, vec!["äöüß", "ßéèà"]);
    }

    #[test]
    fn test_invalid_overlap_rejected() {
        assert!(TextChunker::new(10, 10).is_err());
        assert!(TextChunker::new(0, 0).is_err());
    }

    #[test]
    fn test_chunks_inherit_source() {
        let chunker = TextChunker::new(5, 1).unwrap();
        let doc = Document::new("0123456789".to_string(), Path::new("data/a.txt"), FileType::Txt);
        let chunks = chunker.chunk_document(&doc);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.source.file_name == "a.txt"));
        assert_eq!(chunks[2].chunk_index, 2);
    }
}
