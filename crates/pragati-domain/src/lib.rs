//! Pragati Domain Layer
//!
//! Core data model and trait interfaces for the district scheme knowledge
//! base. This crate defines the shapes that flow through the extraction
//! pipeline and the seams behind which the LLM service and the storage
//! engine live.
//!
//! ## Key Concepts
//!
//! - **ActionPoint**: one named fact/status entry within a sub-category
//! - **SubCategoryRecord**: the persisted unit - action points plus
//!   free-form additional details
//! - **StructuredExtraction**: what one extraction run produces for a
//!   district
//! - **Taxonomy**: the fixed, externally-defined sector/sub-category labels
//!
//! ## Architecture
//!
//! Infrastructure implementations (HTTP completion client, SQLite store)
//! live in other crates and implement the traits defined here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extraction;
pub mod record;
pub mod stored;
pub mod taxonomy;
pub mod traits;

// Re-exports for convenience
pub use extraction::{Sector, StructuredExtraction, SubCategory};
pub use record::{ActionPoint, SubCategoryRecord};
pub use stored::{
    CategoryInfo, DeleteReport, DistrictInfo, DocumentRow, ExtractionRow, HistoryEntry,
};
pub use taxonomy::{SectorDef, TAXONOMY};
pub use traits::{CompletionClient, ExtractionStore, SamplingParams};
