//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! infrastructure. Implementations live in other crates (pragati-llm,
//! pragati-store).

use crate::record::SubCategoryRecord;
use crate::stored::{
    CategoryInfo, DeleteReport, DistrictInfo, DocumentRow, ExtractionRow, HistoryEntry,
};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Sampling parameters passed through to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// Sampling temperature (0-2).
    pub temperature: f64,

    /// Nucleus sampling parameter.
    pub top_p: f64,

    /// Presence penalty (-2 to 2).
    pub presence_penalty: f64,

    /// Seed for reproducible sampling.
    pub seed: i64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            presence_penalty: 0.0,
            seed: 25,
        }
    }
}

impl SamplingParams {
    /// Default parameters at the given temperature.
    pub fn with_temperature(temperature: f64) -> Self {
        Self {
            temperature,
            ..Self::default()
        }
    }
}

/// Trait for sending a prompt to the completion service
///
/// Implemented by the infrastructure layer (pragati-llm). The service is
/// treated as unreliable: every failure mode surfaces as `Self::Error`,
/// never as a panic.
#[async_trait]
pub trait CompletionClient {
    /// Error type for completion operations
    type Error: std::fmt::Display;

    /// Send a prompt and return the raw generated text
    async fn complete(&self, prompt: &str, params: &SamplingParams)
        -> Result<String, Self::Error>;
}

/// Trait for the versioned extraction store
///
/// Implemented by the infrastructure layer (pragati-store). Consistency
/// contract: for any (district, sector, sub-category) key there is at most
/// one latest row at any time, and `store_latest` flips prior rows and
/// inserts the new one as a single unit of work. History rows are never
/// deleted by the merge path; only `delete_district` removes data.
pub trait ExtractionStore {
    /// Error type for store operations
    type Error;

    /// Look up a district by name, creating it on first reference
    fn get_or_create_district(&mut self, name: &str) -> Result<i64, Self::Error>;

    /// Record an uploaded document
    #[allow(clippy::too_many_arguments)]
    fn create_document(
        &mut self,
        district_id: i64,
        file_name: &str,
        file_path: &str,
        upload_date: &str,
        uploaded_by: &str,
        raw_text: &str,
    ) -> Result<i64, Self::Error>;

    /// Fetch a stored document with its owning district's name
    fn document(&self, document_id: i64) -> Result<Option<DocumentRow>, Self::Error>;

    /// Atomically supersede the latest row for a key with a new snapshot
    #[allow(clippy::too_many_arguments)]
    fn store_latest(
        &mut self,
        document_id: i64,
        district_id: i64,
        sector_name: &str,
        sub_category: &str,
        record: &SubCategoryRecord,
        version_date: &str,
    ) -> Result<i64, Self::Error>;

    /// Latest rows for a district, optionally filtered by sector and
    /// sub-category
    fn read_latest(
        &self,
        district_name: &str,
        sector_name: Option<&str>,
        sub_category: Option<&str>,
    ) -> Result<Vec<ExtractionRow>, Self::Error>;

    /// All rows for a district, latest and historical, newest first
    fn read_history(&self, district_name: &str) -> Result<Vec<HistoryEntry>, Self::Error>;

    /// All districts with their document counts
    fn list_districts(&self) -> Result<Vec<DistrictInfo>, Self::Error>;

    /// District names in alphabetical order
    fn district_names(&self) -> Result<Vec<String>, Self::Error>;

    /// Distinct sector/sub-category pairs among latest rows
    fn list_categories(&self) -> Result<Vec<CategoryInfo>, Self::Error>;

    /// Mean achievement percentage per sector across latest rows
    fn district_analytics(&self, district_name: &str)
        -> Result<BTreeMap<String, f64>, Self::Error>;

    /// Remove a district with its documents and extractions; `None` when
    /// the district does not exist
    fn delete_district(&mut self, name: &str) -> Result<Option<DeleteReport>, Self::Error>;
}
