//! Document ingestion: record the document, then extract and store.

use crate::cli::IngestArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pragati_domain::traits::ExtractionStore;
use pragati_extractor::ExtractionPipeline;
use pragati_llm::CompletionsClient;
use pragati_store::SqliteStore;
use std::fs;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Execute the ingest command.
///
/// The district must already exist; ingesting into an unknown district is
/// an input error, not an implicit create. The document row is written
/// before extraction starts, so a failed extraction leaves the raw text
/// available for `pragati extract <id>`.
pub async fn execute_ingest(
    args: IngestArgs,
    store: &Arc<Mutex<SqliteStore>>,
    pipeline: &ExtractionPipeline<CompletionsClient, SqliteStore>,
    formatter: &Formatter,
) -> Result<()> {
    let upload_date = resolve_upload_date(args.date.as_deref())?;

    let document_text = fs::read_to_string(&args.file)?;
    if document_text.trim().is_empty() {
        return Err(CliError::InvalidInput(format!(
            "{} contains no text",
            args.file.display()
        )));
    }

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    let document_id = {
        let mut store = store
            .lock()
            .map_err(|_| CliError::Config("store lock poisoned".into()))?;
        if !store.district_names()?.contains(&args.district) {
            return Err(CliError::UnknownDistrict(args.district));
        }
        let district_id = store.get_or_create_district(&args.district)?;
        store.create_document(
            district_id,
            &file_name,
            &args.file.display().to_string(),
            &upload_date,
            &args.uploaded_by,
            &document_text,
        )?
    };
    info!(
        "Recorded document {} ({}) for district '{}'",
        document_id, file_name, args.district
    );

    match pipeline
        .extract_and_store(document_id, &args.district, &document_text, &upload_date)
        .await
    {
        Ok(report) => formatter.report(document_id, &report)?,
        Err(e) => {
            formatter.warning(&format!(
                "Document {} was saved but extraction failed; retry with `pragati extract {}`.",
                document_id, document_id
            ));
            return Err(e.into());
        }
    }
    Ok(())
}

fn resolve_upload_date(date: Option<&str>) -> Result<String> {
    match date {
        Some(given) => {
            chrono::NaiveDate::parse_from_str(given, "%Y-%m-%d").map_err(|_| {
                CliError::InvalidInput(format!(
                    "upload date must be YYYY-MM-DD, got '{}'",
                    given
                ))
            })?;
            Ok(given.to_string())
        }
        None => Ok(chrono::Local::now().format("%Y-%m-%d").to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_date_passes_through() {
        assert_eq!(resolve_upload_date(Some("2025-06-01")).unwrap(), "2025-06-01");
    }

    #[test]
    fn test_malformed_dates_are_rejected() {
        for bad in ["01-06-2025", "2025/06/01", "2025-13-01", "yesterday"] {
            assert!(resolve_upload_date(Some(bad)).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        let today = resolve_upload_date(None).unwrap();
        assert!(chrono::NaiveDate::parse_from_str(&today, "%Y-%m-%d").is_ok());
    }
}
