//! Re-extraction of a stored document.

use crate::cli::ExtractArgs;
use crate::error::Result;
use crate::output::Formatter;
use pragati_extractor::ExtractionPipeline;
use pragati_llm::CompletionsClient;
use pragati_store::SqliteStore;

/// Execute the extract command.
///
/// Re-runs extraction from the document's stored raw text; new snapshots
/// supersede the prior latest rows for every key the document yields.
pub async fn execute_extract(
    args: ExtractArgs,
    pipeline: &ExtractionPipeline<CompletionsClient, SqliteStore>,
    formatter: &Formatter,
) -> Result<()> {
    let report = pipeline.re_extract(args.document_id).await?;
    formatter.report(args.document_id, &report)?;
    Ok(())
}
