//! Grounded question answering over stored knowledge
//!
//! Formats a district's latest snapshots into a textual context and asks
//! the completion service to answer from that context alone.

use crate::config::ExtractorConfig;
use crate::error::ChatError;
use crate::prompt::build_chat_prompt;
use pragati_domain::traits::{CompletionClient, ExtractionStore, SamplingParams};
use pragati_domain::{ExtractionRow, SubCategoryRecord};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Answers questions about a district from its latest stored snapshots
pub struct ChatService<C, S> {
    client: Arc<C>,
    store: Arc<Mutex<S>>,
    temperature: f64,
}

impl<C, S> ChatService<C, S>
where
    C: CompletionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
    S: ExtractionStore,
    S::Error: std::fmt::Display,
{
    /// Build a chat service over the shared client and store
    pub fn new(client: Arc<C>, store: Arc<Mutex<S>>, config: &ExtractorConfig) -> Self {
        Self {
            client,
            store,
            temperature: config.chat_temperature,
        }
    }

    /// Answer a question about a district, optionally narrowed to one
    /// sector or sub-category
    pub async fn ask(
        &self,
        district_name: &str,
        question: &str,
        sector_name: Option<&str>,
        sub_category: Option<&str>,
    ) -> Result<String, ChatError> {
        let rows = {
            let store = self
                .store
                .lock()
                .map_err(|_| ChatError::Store("store lock poisoned".to_string()))?;
            store
                .read_latest(district_name, sector_name, sub_category)
                .map_err(|e| ChatError::Store(e.to_string()))?
        };

        let context = format_context(&rows).ok_or_else(|| ChatError::NoData(district_name.to_string()))?;
        debug!("Chat context for '{}': {} chars", district_name, context.len());

        let prompt = build_chat_prompt(question, &context, district_name);
        self.client
            .complete(&prompt, &SamplingParams::with_temperature(self.temperature))
            .await
            .map_err(|e| ChatError::Llm(e.to_string()))
    }
}

/// Render latest rows into the context block the chat prompt embeds.
///
/// Returns `None` when there are no usable rows; rows whose payload does
/// not parse are skipped.
pub fn format_context(rows: &[ExtractionRow]) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    for row in rows {
        let Ok(record) = serde_json::from_str::<SubCategoryRecord>(&row.data_json) else {
            continue;
        };

        parts.push(String::new());
        parts.push(format!("Sector: {}", row.sector_name));
        parts.push(format!("Sub-Category: {}", row.sub_category));
        parts.push(format!("Version Date: {}", row.version_date));
        parts.push(format!("Source Document: {}", row.file_name));

        for ap in &record.action_points {
            parts.push(format!("  - Action: {}", ap.action_name));
            if let Some(status) = &ap.current_status {
                parts.push(format!("    Status: {}", status));
            }
            if let Some(percentage) = ap.achievement_percentage {
                parts.push(format!("    Achievement: {}%", percentage));
            }
            if let Some(source) = &ap.data_source {
                parts.push(format!("    Data Source: {}", source));
            }
            if let Some(remarks) = &ap.remarks {
                parts.push(format!("    Remarks: {}", remarks));
            }
        }
        parts.push(String::new());
    }

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pragati_domain::ActionPoint;

    fn row(sector: &str, sub: &str, data_json: &str) -> ExtractionRow {
        ExtractionRow {
            id: 1,
            document_id: 1,
            district_id: 1,
            sector_name: sector.to_string(),
            sub_category: sub.to_string(),
            data_json: data_json.to_string(),
            version_date: "2025-06-01".to_string(),
            is_latest: true,
            file_name: "report.pdf".to_string(),
        }
    }

    #[test]
    fn test_context_includes_all_present_fields() {
        let record = SubCategoryRecord {
            action_points: vec![ActionPoint {
                action_name: "Health Coverage under Ayushman Bharat and CMAAY".to_string(),
                current_status: Some("On Track".to_string()),
                achievement_percentage: Some(94.4),
                data_source: Some("CMAAY portal".to_string()),
                remarks: None,
            }],
            additional_details: Default::default(),
        };
        let data_json = serde_json::to_string(&record).unwrap();
        let rows = vec![row("Swasth Arunachal: Health", "Health Coverage under Ayushman Bharat and CMAAY", &data_json)];

        let context = format_context(&rows).unwrap();
        assert!(context.contains("Sector: Swasth Arunachal: Health"));
        assert!(context.contains("Version Date: 2025-06-01"));
        assert!(context.contains("Source Document: report.pdf"));
        assert!(context.contains("  - Action: Health Coverage under Ayushman Bharat and CMAAY"));
        assert!(context.contains("    Status: On Track"));
        assert!(context.contains("    Achievement: 94.4%"));
        assert!(context.contains("    Data Source: CMAAY portal"));
        assert!(!context.contains("Remarks:"));
    }

    #[test]
    fn test_no_rows_yields_no_context() {
        assert!(format_context(&[]).is_none());
    }

    #[test]
    fn test_unreadable_payload_rows_are_skipped() {
        let rows = vec![row("Health", "Theme", "not json at all")];
        assert!(format_context(&rows).is_none());
    }
}
