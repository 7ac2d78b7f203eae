//! Resume ingestion: uploaded bytes to analyzable text segments.

use crate::errors::PipelineError;

const CHUNK_SIZE: usize = 1000;
const CHUNK_OVERLAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
}

impl DocumentFormat {
    pub fn from_filename(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if lower.ends_with(".txt") {
            Some(Self::Text)
        } else {
            None
        }
    }
}

/// Splits resume documents into overlapping segments sized for the model
/// context window.
pub struct DocumentIngestor {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl DocumentIngestor {
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_overlap: CHUNK_OVERLAP,
        }
    }

    /// Extracts text from the upload and segments it. PDF extraction runs
    /// in memory; nothing is written to disk.
    pub fn segment(&self, bytes: &[u8], file_name: &str) -> Result<Vec<String>, PipelineError> {
        let format = DocumentFormat::from_filename(file_name).ok_or_else(|| {
            PipelineError::Validation(format!("Unsupported file format: {file_name}"))
        })?;
        let text = match format {
            DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| PipelineError::Validation(format!("Could not read PDF content: {e}")))?,
            DocumentFormat::Text => String::from_utf8_lossy(bytes).into_owned(),
        };
        Ok(chunk_text(&text, self.chunk_size, self.chunk_overlap))
    }
}

impl Default for DocumentIngestor {
    fn default() -> Self {
        Self::new()
    }
}

/// Character-window chunker. Consecutive chunks share `overlap` characters
/// so a sentence cut at a boundary still appears whole in one of them.
fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= size {
        return vec![text.to_string()];
    }
    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}
