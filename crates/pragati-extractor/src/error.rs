//! Error types for the extraction pipeline

use thiserror::Error;

/// Errors recovering a JSON object from raw model output
#[derive(Error, Debug)]
pub enum ParseError {
    /// The response was empty or whitespace
    #[error("Empty response")]
    Empty,

    /// No `{ ... }` object could be located in the response
    #[error("No JSON object found in response")]
    NoJsonObject,

    /// The located substring was not valid JSON
    #[error("JSON parse error: {0}")]
    Json(String),
}

/// Errors turning a document into per-chunk structured records
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion client error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model output could not be recovered as JSON
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Recovered JSON did not match the expected extraction shape
    #[error("Response shape error: {0}")]
    InvalidShape(String),

    /// More than half of the document's chunks failed
    #[error("Too many failed chunks: {failed} of {total}")]
    TooManyFailedChunks {
        /// Chunks that failed to complete or parse
        failed: usize,
        /// Total chunks the document was split into
        total: usize,
    },

    /// Every chunk produced an empty or unusable result
    #[error("No chunk produced usable output")]
    NoUsableChunks,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors from the extract-and-store pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The document's extraction failed as a whole
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractorError),

    /// Versioned store error outside any per-key scope
    #[error("Store error: {0}")]
    Store(String),

    /// Re-extraction was requested for an unknown document
    #[error("Document not found: {0}")]
    DocumentNotFound(i64),
}

/// Errors answering a question over stored knowledge
#[derive(Error, Debug)]
pub enum ChatError {
    /// The district has no latest rows to ground an answer on
    #[error("No data found for district '{0}'")]
    NoData(String),

    /// Completion client error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Versioned store error
    #[error("Store error: {0}")]
    Store(String),
}
