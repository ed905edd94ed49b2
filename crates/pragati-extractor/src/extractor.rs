//! Per-chunk extraction against the completion service

use crate::chunking::Chunker;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::prompt::build_extraction_prompt;
use pragati_domain::traits::{CompletionClient, SamplingParams};
use pragati_domain::StructuredExtraction;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Turns document text into per-chunk partial extractions
///
/// Constructed once with its completion client and handed into the
/// pipeline by reference; it is cheap to clone (the client is shared).
pub struct ChunkExtractor<C> {
    client: Arc<C>,
    config: ExtractorConfig,
}

impl<C> Clone for ChunkExtractor<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            config: self.config.clone(),
        }
    }
}

impl<C> ChunkExtractor<C>
where
    C: CompletionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    /// Create an extractor, validating the configuration up front
    pub fn new(client: Arc<C>, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        // Fails on the same overlap/chunk-size misconfiguration before
        // any network call is issued.
        Chunker::new(config.chunk_size, config.overlap_size)?;
        Ok(Self { client, config })
    }

    /// Extract one chunk into a partial structured record
    pub async fn extract_chunk(
        &self,
        chunk: &str,
        district: &str,
        upload_date: &str,
        chunk_num: usize,
        total_chunks: usize,
    ) -> Result<StructuredExtraction, ExtractorError> {
        let prompt = build_extraction_prompt(chunk, district, upload_date, chunk_num, total_chunks);
        debug!(
            "Extracting chunk {}/{} ({} chars of text, {} chars of prompt)",
            chunk_num,
            total_chunks,
            chunk.len(),
            prompt.len()
        );

        let params = SamplingParams::with_temperature(self.config.extraction_temperature);
        let raw = self
            .client
            .complete(&prompt, &params)
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        let value = parse_response(&raw)?;
        serde_json::from_value(value).map_err(|e| ExtractorError::InvalidShape(e.to_string()))
    }

    /// Extract all chunks of one document, in bounded parallel
    ///
    /// Results come back in chunk order regardless of completion order;
    /// the cross-chunk merge tie-break is defined over the chunk
    /// sequence. Failed chunks are tolerated until strictly more than
    /// half fail, at which point the whole document is reported failed.
    pub async fn extract_document(
        &self,
        text: &str,
        district: &str,
        upload_date: &str,
    ) -> Result<Vec<StructuredExtraction>, ExtractorError> {
        let chunker = Chunker::new(self.config.chunk_size, self.config.overlap_size)?;
        let chunks = chunker.split(text);
        let total = chunks.len();
        info!(
            "Extracting document for '{}': {} chars in {} chunk(s)",
            district,
            text.len(),
            total
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_chunks));
        let mut handles = Vec::with_capacity(total);
        for (index, chunk) in chunks.into_iter().enumerate() {
            let extractor = self.clone();
            let district = district.to_string();
            let upload_date = upload_date.to_string();
            let semaphore = Arc::clone(&semaphore);
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| ExtractorError::Llm("chunk scheduler stopped".to_string()))?;
                extractor
                    .extract_chunk(&chunk, &district, &upload_date, index + 1, total)
                    .await
            }));
        }

        // Awaiting handles in spawn order reassembles results in chunk
        // order whatever the completion order was.
        let mut partials = Vec::with_capacity(total);
        let mut failed = 0;
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(partial)) => partials.push(partial),
                Ok(Err(e)) => {
                    warn!("Chunk {}/{} failed: {}", index + 1, total, e);
                    failed += 1;
                }
                Err(e) => {
                    warn!("Chunk {}/{} task aborted: {}", index + 1, total, e);
                    failed += 1;
                }
            }
        }

        if failed * 2 > total {
            return Err(ExtractorError::TooManyFailedChunks { failed, total });
        }
        if partials.is_empty() {
            return Err(ExtractorError::NoUsableChunks);
        }
        if failed > 0 {
            warn!(
                "{} of {} chunks failed; continuing with the {} that succeeded",
                failed,
                total,
                partials.len()
            );
        }
        Ok(partials)
    }
}
