//! End-to-end pipeline tests against a mock completion client and an
//! in-memory store

use pragati_domain::traits::ExtractionStore;
use pragati_domain::SubCategoryRecord;
use pragati_extractor::{ExtractionPipeline, ExtractorConfig, PipelineError};
use pragati_llm::MockClient;
use pragati_store::SqliteStore;
use std::sync::{Arc, Mutex};

const HEALTH_SECTOR: &str = "Swasth Arunachal: Health";
const HEALTH_THEME: &str = "One District One Health Theme";

fn response(sub_category: &str, action_json: &str) -> String {
    format!(
        r#"{{
            "district": "Tawang",
            "upload_date": "2025-06-01",
            "sectors": [{{
                "sector_name": "{HEALTH_SECTOR}",
                "sub_categories": [{{
                    "sub_category_name": "{sub_category}",
                    "information": {{
                        "action_points": [{action_json}],
                        "additional_details": {{}}
                    }}
                }}]
            }}]
        }}"#
    )
}

fn pipeline_with(
    client: MockClient,
    config: ExtractorConfig,
) -> (
    ExtractionPipeline<MockClient, SqliteStore>,
    Arc<Mutex<SqliteStore>>,
) {
    let store = Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap()));
    let pipeline = ExtractionPipeline::new(Arc::new(client), Arc::clone(&store), config).unwrap();
    (pipeline, store)
}

fn seed_document(store: &Arc<Mutex<SqliteStore>>, file: &str, date: &str) -> i64 {
    let mut store = store.lock().unwrap();
    let district_id = store.get_or_create_district("Tawang").unwrap();
    store
        .create_document(district_id, file, &format!("/uploads/{}", file), date, "admin", "text")
        .unwrap()
}

fn latest_record(store: &Arc<Mutex<SqliteStore>>, sub_category: &str) -> SubCategoryRecord {
    let store = store.lock().unwrap();
    let rows = store
        .read_latest("Tawang", Some(HEALTH_SECTOR), Some(sub_category))
        .unwrap();
    assert_eq!(rows.len(), 1, "expected exactly one latest row");
    serde_json::from_str(&rows[0].data_json).unwrap()
}

#[tokio::test]
async fn test_single_chunk_document_is_stored() {
    let client = MockClient::new(response(
        HEALTH_THEME,
        r#"{"action_name": "One District One Health Theme", "current_status": "In Progress", "achievement_percentage": 40}"#,
    ));
    let (pipeline, store) = pipeline_with(client, ExtractorConfig::default());
    let document_id = seed_document(&store, "june.pdf", "2025-06-01");

    let report = pipeline
        .extract_and_store(document_id, "Tawang", "short document text", "2025-06-01")
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.stored_count, 1);
    assert!(report.errors.is_empty());

    let record = latest_record(&store, HEALTH_THEME);
    assert_eq!(record.action_points.len(), 1);
    assert_eq!(record.action_points[0].achievement_percentage, Some(40.0));
}

#[tokio::test]
async fn test_three_chunk_scenario_merges_in_chunk_order() {
    // 20000 chars at size 8000 / overlap 500 is exactly three windows.
    // Chunk 1 sees X without a percentage, chunk 2 sees X at 75; the
    // merged snapshot carries 75.
    let mut client = MockClient::new("{}");
    client.add_response(
        "chunk 1 of 3",
        &response(
            HEALTH_THEME,
            r#"{"action_name": "One District One Health Theme", "current_status": "In Progress", "achievement_percentage": null}"#,
        ),
    );
    client.add_response(
        "chunk 2 of 3",
        &response(
            HEALTH_THEME,
            r#"{"action_name": "One District One Health Theme", "achievement_percentage": 75}"#,
        ),
    );
    client.add_response(
        "chunk 3 of 3",
        r#"{"district": "Tawang", "upload_date": "2025-06-01", "sectors": []}"#,
    );

    let (pipeline, store) = pipeline_with(client, ExtractorConfig::default());
    let document_id = seed_document(&store, "large.pdf", "2025-06-01");

    let text = "a".repeat(20000);
    let report = pipeline
        .extract_and_store(document_id, "Tawang", &text, "2025-06-01")
        .await
        .unwrap();
    assert_eq!(report.stored_count, 1);

    let record = latest_record(&store, HEALTH_THEME);
    assert_eq!(record.action_points.len(), 1);
    let x = &record.action_points[0];
    assert_eq!(x.achievement_percentage, Some(75.0));
    // Null-aware: chunk 2 carried no status, chunk 1's survives.
    assert_eq!(x.current_status.as_deref(), Some("In Progress"));
}

#[tokio::test]
async fn test_separate_uploads_accumulate_per_key() {
    let first = MockClient::new(response(
        HEALTH_THEME,
        r#"{"action_name": "A", "current_status": "done"}"#,
    ));
    let (pipeline, store) = pipeline_with(first, ExtractorConfig::default());
    let doc1 = seed_document(&store, "jan.pdf", "2025-01-15");
    pipeline
        .extract_and_store(doc1, "Tawang", "first upload", "2025-01-15")
        .await
        .unwrap();

    let second = MockClient::new(response(
        HEALTH_THEME,
        r#"{"action_name": "B", "current_status": "pending"}"#,
    ));
    let pipeline = ExtractionPipeline::new(
        Arc::new(second),
        Arc::clone(&store),
        ExtractorConfig::default(),
    )
    .unwrap();
    let doc2 = seed_document(&store, "feb.pdf", "2025-02-15");
    pipeline
        .extract_and_store(doc2, "Tawang", "second upload", "2025-02-15")
        .await
        .unwrap();

    // Both facts are present; A is untouched by the unrelated upload.
    let record = latest_record(&store, HEALTH_THEME);
    let names: Vec<_> = record
        .action_points
        .iter()
        .map(|p| p.action_name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(record.action_points[0].current_status.as_deref(), Some("done"));

    // One latest row, one historical row for the key.
    let store = store.lock().unwrap();
    let history = store.read_history("Tawang").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.iter().filter(|h| h.is_latest).count(), 1);
    assert_eq!(history[0].version_date, "2025-02-15");
}

#[tokio::test]
async fn test_new_upload_overwrites_restated_fact_wholesale() {
    let first = MockClient::new(response(
        HEALTH_THEME,
        r#"{"action_name": "A", "current_status": "In Progress", "achievement_percentage": 60}"#,
    ));
    let (pipeline, store) = pipeline_with(first, ExtractorConfig::default());
    let doc1 = seed_document(&store, "jan.pdf", "2025-01-15");
    pipeline
        .extract_and_store(doc1, "Tawang", "first", "2025-01-15")
        .await
        .unwrap();

    let second = MockClient::new(response(
        HEALTH_THEME,
        r#"{"action_name": "A", "current_status": "Completed"}"#,
    ));
    let pipeline = ExtractionPipeline::new(
        Arc::new(second),
        Arc::clone(&store),
        ExtractorConfig::default(),
    )
    .unwrap();
    let doc2 = seed_document(&store, "feb.pdf", "2025-02-15");
    pipeline
        .extract_and_store(doc2, "Tawang", "second", "2025-02-15")
        .await
        .unwrap();

    // The restated fact is replaced wholesale: the new upload carried no
    // percentage, so none is kept.
    let record = latest_record(&store, HEALTH_THEME);
    assert_eq!(record.action_points.len(), 1);
    assert_eq!(record.action_points[0].current_status.as_deref(), Some("Completed"));
    assert_eq!(record.action_points[0].achievement_percentage, None);
}

#[tokio::test]
async fn test_re_extraction_is_idempotent() {
    let client = MockClient::new(response(
        HEALTH_THEME,
        r#"{"action_name": "A", "current_status": "done"}"#,
    ));
    let (pipeline, store) = pipeline_with(client, ExtractorConfig::default());
    let document_id = seed_document(&store, "june.pdf", "2025-06-01");

    pipeline
        .extract_and_store(document_id, "Tawang", "text", "2025-06-01")
        .await
        .unwrap();
    let report = pipeline.re_extract(document_id).await.unwrap();
    assert_eq!(report.stored_count, 1);

    // Re-running supersedes rather than duplicates.
    let record = latest_record(&store, HEALTH_THEME);
    assert_eq!(record.action_points.len(), 1);

    let store = store.lock().unwrap();
    let history = store.read_history("Tawang").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.iter().filter(|h| h.is_latest).count(), 1);
}

#[tokio::test]
async fn test_re_extract_unknown_document_fails() {
    let (pipeline, _store) = pipeline_with(MockClient::default(), ExtractorConfig::default());
    let result = pipeline.re_extract(404).await;
    assert!(matches!(result, Err(PipelineError::DocumentNotFound(404))));
}

#[tokio::test]
async fn test_majority_chunk_failure_fails_the_run() {
    // 35000 chars at size 8000 / overlap 500 is five windows; three of
    // them failing sinks the whole document.
    let mut client =
        MockClient::new(r#"{"district": "Tawang", "upload_date": "2025-06-01", "sectors": []}"#);
    client.add_failure("chunk 1 of 5");
    client.add_failure("chunk 2 of 5");
    client.add_failure("chunk 3 of 5");

    let (pipeline, store) = pipeline_with(client, ExtractorConfig::default());
    let document_id = seed_document(&store, "large.pdf", "2025-06-01");

    let text = "a".repeat(35000);
    let result = pipeline
        .extract_and_store(document_id, "Tawang", &text, "2025-06-01")
        .await;
    assert!(matches!(result, Err(PipelineError::Extraction(_))));

    // Nothing was stored for the failed run.
    let store = store.lock().unwrap();
    assert!(store.read_latest("Tawang", None, None).unwrap().is_empty());
}

#[tokio::test]
async fn test_document_with_no_extractable_data_stores_nothing() {
    let client = MockClient::new(
        r#"{"district": "Tawang", "upload_date": "2025-06-01", "sectors": []}"#,
    );
    let (pipeline, store) = pipeline_with(client, ExtractorConfig::default());
    let document_id = seed_document(&store, "empty.pdf", "2025-06-01");

    let report = pipeline
        .extract_and_store(document_id, "Tawang", "nothing relevant", "2025-06-01")
        .await
        .unwrap();
    assert!(report.success);
    assert_eq!(report.stored_count, 0);
    assert!(report.errors.is_empty());

    let store = store.lock().unwrap();
    assert!(store.read_latest("Tawang", None, None).unwrap().is_empty());
}
