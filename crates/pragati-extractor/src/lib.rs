//! Pragati Extractor
//!
//! The document-to-structured-data extraction and merge pipeline.
//!
//! # Overview
//!
//! A document's already-decoded text is split into overlapping windows,
//! each window is extracted against the completion service, the partial
//! results are merged back into one record per (sector, sub-category),
//! and each record is merged into the stored knowledge for its district
//! before being persisted as the new latest snapshot.
//!
//! # Architecture
//!
//! ```text
//! Text → Chunker → [ChunkExtractor]×N → merge_chunks
//!      → per-key: read latest → merge_into_history → store latest
//! ```
//!
//! # Key Properties
//!
//! - **Defensive parsing**: model output is recovered from prose and
//!   code fences; a chunk that cannot be recovered simply produced
//!   nothing
//! - **Majority-failure guard**: a document fails as a whole only when
//!   strictly more than half of its chunks fail
//! - **Order-stable merging**: later chunks win ties, defined over chunk
//!   order rather than completion order
//! - **Per-key serialization**: read-merge-write for one (district,
//!   sector, sub-category) key never interleaves with another run's
//!
//! # Example Usage
//!
//! ```no_run
//! use pragati_extractor::{ExtractionPipeline, ExtractorConfig};
//! use pragati_llm::MockClient;
//! use pragati_store::SqliteStore;
//! use std::sync::{Arc, Mutex};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(MockClient::new("{\"sectors\": []}"));
//! let store = Arc::new(Mutex::new(SqliteStore::new(":memory:")?));
//! let pipeline = ExtractionPipeline::new(client, store, ExtractorConfig::default())?;
//!
//! let report = pipeline
//!     .extract_and_store(1, "Tawang", "document text", "2025-06-01")
//!     .await?;
//! println!("Stored {} key(s)", report.stored_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chat;
mod chunking;
mod config;
mod error;
mod extractor;
mod merge;
mod parser;
mod pipeline;
mod prompt;

pub use chat::{format_context, ChatService};
pub use chunking::Chunker;
pub use config::ExtractorConfig;
pub use error::{ChatError, ExtractorError, ParseError, PipelineError};
pub use extractor::ChunkExtractor;
pub use merge::{merge_chunks, merge_into_history};
pub use parser::parse_response;
pub use pipeline::{ExtractionPipeline, ExtractionReport};
pub use prompt::{build_chat_prompt, build_extraction_prompt};
