//! The extract-and-store pipeline
//!
//! Orchestrates one document run end to end: chunk extraction, the
//! cross-chunk merge, and then one read-merge-write per (sector,
//! sub-category) key against the versioned store. The read-merge-write
//! for a key is serialized through a per-key async lock; without it two
//! concurrent re-extractions of the same key could interleave and
//! silently drop one side's update. Keys are otherwise independent: a
//! failure storing one key is collected into the report and the rest
//! proceed.

use crate::config::ExtractorConfig;
use crate::error::PipelineError;
use crate::extractor::ChunkExtractor;
use crate::merge::{merge_chunks, merge_into_history};
use pragati_domain::traits::{CompletionClient, ExtractionStore};
use pragati_domain::{Sector, SubCategoryRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Outcome of one extraction run, reported to the caller key by key
///
/// Partial success is still success: `errors` lists every (sector,
/// sub-category) key that failed to store while the others went through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    /// Whether the run produced stored output
    pub success: bool,

    /// Keys stored or superseded by this run
    pub stored_count: usize,

    /// Per-key failures, formatted `sector/sub-category: cause`
    pub errors: Vec<String>,
}

type KeyLock = Arc<tokio::sync::Mutex<()>>;

/// One document's extraction pipeline, constructed once and shared
pub struct ExtractionPipeline<C, S> {
    extractor: ChunkExtractor<C>,
    store: Arc<Mutex<S>>,
    key_locks: tokio::sync::Mutex<HashMap<(String, String, String), KeyLock>>,
}

impl<C, S> ExtractionPipeline<C, S>
where
    C: CompletionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
    S: ExtractionStore,
    S::Error: std::fmt::Display,
{
    /// Build a pipeline from its injected collaborators
    pub fn new(
        client: Arc<C>,
        store: Arc<Mutex<S>>,
        config: ExtractorConfig,
    ) -> Result<Self, PipelineError> {
        let extractor = ChunkExtractor::new(client, config)?;
        Ok(Self {
            extractor,
            store,
            key_locks: tokio::sync::Mutex::new(HashMap::new()),
        })
    }

    /// Run extraction for a document and persist per-key snapshots
    pub async fn extract_and_store(
        &self,
        document_id: i64,
        district_name: &str,
        document_text: &str,
        upload_date: &str,
    ) -> Result<ExtractionReport, PipelineError> {
        let district_id = {
            let mut store = self.lock_store()?;
            store
                .get_or_create_district(district_name)
                .map_err(|e| PipelineError::Store(e.to_string()))?
        };

        let partials = self
            .extractor
            .extract_document(document_text, district_name, upload_date)
            .await?;
        let merged = merge_chunks(partials, district_name, upload_date);

        let mut stored_count = 0;
        let mut errors = Vec::new();
        for sector in merged.sectors {
            let Sector {
                sector_name,
                sub_categories,
            } = sector;
            for sub_category in sub_categories {
                let sub_name = sub_category.sub_category_name.clone();
                let record = sub_category.into_record();
                match self
                    .store_key(
                        document_id,
                        district_id,
                        district_name,
                        &sector_name,
                        &sub_name,
                        record,
                        upload_date,
                    )
                    .await
                {
                    Ok(()) => stored_count += 1,
                    Err(e) => {
                        warn!("Failed to store {}/{}: {}", sector_name, sub_name, e);
                        errors.push(format!("{}/{}: {}", sector_name, sub_name, e));
                    }
                }
            }
        }

        info!(
            "Extraction run for document {} stored {} key(s), {} error(s)",
            document_id,
            stored_count,
            errors.len()
        );
        Ok(ExtractionReport {
            success: true,
            stored_count,
            errors,
        })
    }

    /// Re-run extraction for an already-stored document from its raw text
    ///
    /// The new snapshots supersede the prior latest rows for every key
    /// the document yields; history rows are retained.
    pub async fn re_extract(&self, document_id: i64) -> Result<ExtractionReport, PipelineError> {
        let document = {
            let store = self.lock_store()?;
            store
                .document(document_id)
                .map_err(|e| PipelineError::Store(e.to_string()))?
        }
        .ok_or(PipelineError::DocumentNotFound(document_id))?;

        self.extract_and_store(
            document.id,
            &document.district_name,
            &document.raw_text,
            &document.upload_date,
        )
        .await
    }

    /// Read-merge-write one key under its per-key lock.
    #[allow(clippy::too_many_arguments)]
    async fn store_key(
        &self,
        document_id: i64,
        district_id: i64,
        district_name: &str,
        sector_name: &str,
        sub_category: &str,
        record: SubCategoryRecord,
        version_date: &str,
    ) -> Result<(), PipelineError> {
        let lock = self.key_lock(district_name, sector_name, sub_category).await;
        let _guard = lock.lock().await;

        let prior = {
            let store = self.lock_store()?;
            let rows = store
                .read_latest(district_name, Some(sector_name), Some(sub_category))
                .map_err(|e| PipelineError::Store(e.to_string()))?;
            rows.into_iter().next().and_then(|row| {
                match serde_json::from_str::<SubCategoryRecord>(&row.data_json) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        // An unreadable stored payload is treated as
                        // absent rather than blocking the new snapshot.
                        warn!(
                            "Stored payload for {}/{} is unreadable, superseding it: {}",
                            sector_name, sub_category, e
                        );
                        None
                    }
                }
            })
        };

        let merged = merge_into_history(record, prior.as_ref());

        let mut store = self.lock_store()?;
        store
            .store_latest(
                document_id,
                district_id,
                sector_name,
                sub_category,
                &merged,
                version_date,
            )
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        Ok(())
    }

    async fn key_lock(&self, district: &str, sector: &str, sub_category: &str) -> KeyLock {
        let mut locks = self.key_locks.lock().await;
        locks
            .entry((
                district.to_string(),
                sector.to_string(),
                sub_category.to_string(),
            ))
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn lock_store(&self) -> Result<std::sync::MutexGuard<'_, S>, PipelineError> {
        self.store
            .lock()
            .map_err(|_| PipelineError::Store("store lock poisoned".to_string()))
    }
}
