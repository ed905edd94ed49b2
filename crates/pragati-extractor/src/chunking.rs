//! Overlapping fixed-size windows over document text
//!
//! Window arithmetic is in characters, never bytes, so a window edge can
//! never split a UTF-8 sequence. Overlap is not deduplicated here; the
//! cross-chunk merger collapses facts that appear in two windows.

use crate::error::ExtractorError;

/// Splits text into overlapping fixed-size windows
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap_size: usize,
}

impl Chunker {
    /// Create a chunker, rejecting `overlap_size >= chunk_size` up front
    pub fn new(chunk_size: usize, overlap_size: usize) -> Result<Self, ExtractorError> {
        if chunk_size == 0 {
            return Err(ExtractorError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if overlap_size >= chunk_size {
            return Err(ExtractorError::Config(format!(
                "overlap_size ({}) must be smaller than chunk_size ({})",
                overlap_size, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap_size,
        })
    }

    /// Split `text` into windows of `chunk_size` chars advancing by
    /// `chunk_size - overlap_size`
    ///
    /// Text at most one window wide comes back as a single chunk. The
    /// window that reaches the end of the text is the last one, so the
    /// tail is covered exactly once.
    pub fn split(&self, text: &str) -> Vec<String> {
        // Byte offset of every char boundary, plus the end of the text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = boundaries.len() - 1;

        if char_len <= self.chunk_size {
            return vec![text.to_string()];
        }

        let step = self.chunk_size - self.overlap_size;
        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(char_len);
            chunks.push(text[boundaries[start]..boundaries[end]].to_string());
            if end == char_len {
                break;
            }
            start += step;
        }
        chunks
    }
}
