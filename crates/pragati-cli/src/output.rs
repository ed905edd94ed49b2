//! Output formatting for query results.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::Colorize;
use pragati_domain::{
    CategoryInfo, DistrictInfo, ExtractionRow, HistoryEntry, SubCategoryRecord,
};
use pragati_extractor::ExtractionReport;
use std::collections::BTreeMap;
use tabled::{settings::Style, Table, Tabled};

/// Output format.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable tables
    Table,
    /// JSON, one document per invocation
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// Renders command results as tables or JSON.
pub struct Formatter {
    format: OutputFormat,
    color: bool,
}

#[derive(Tabled)]
struct DistrictRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "District")]
    name: String,
    #[tabled(rename = "Documents")]
    documents: i64,
}

#[derive(Tabled)]
struct LatestRow {
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Sub-Category")]
    sub_category: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Achievement")]
    achievement: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Source")]
    source: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Sub-Category")]
    sub_category: String,
    #[tabled(rename = "Document")]
    document: String,
    #[tabled(rename = "Uploaded By")]
    uploaded_by: String,
    #[tabled(rename = "Latest")]
    latest: String,
}

#[derive(Tabled)]
struct AnalyticsRow {
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Avg Achievement %")]
    achievement: String,
}

impl Formatter {
    /// Create a formatter.
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a success line (suppressed in JSON mode).
    pub fn success(&self, message: &str) {
        if self.is_json() {
            return;
        }
        if self.color {
            println!("{}", message.green());
        } else {
            println!("{}", message);
        }
    }

    /// Print a warning line to stderr.
    pub fn warning(&self, message: &str) {
        if self.color {
            eprintln!("{}", message.yellow());
        } else {
            eprintln!("{}", message);
        }
    }

    /// Render the district list.
    pub fn districts(&self, districts: &[DistrictInfo]) -> Result<()> {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(districts)?);
            return Ok(());
        }
        if districts.is_empty() {
            println!("No districts yet.");
            return Ok(());
        }
        let rows: Vec<DistrictRow> = districts
            .iter()
            .map(|d| DistrictRow {
                id: d.id,
                name: d.name.clone(),
                documents: d.document_count,
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::sharp()));
        Ok(())
    }

    /// Render latest snapshots, one line per action point.
    pub fn latest(&self, rows: &[ExtractionRow]) -> Result<()> {
        if self.is_json() {
            let expanded: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    let payload: serde_json::Value = serde_json::from_str(&row.data_json)
                        .unwrap_or(serde_json::Value::Null);
                    serde_json::json!({
                        "sector_name": row.sector_name,
                        "sub_category": row.sub_category,
                        "version_date": row.version_date,
                        "file_name": row.file_name,
                        "data": payload,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&expanded)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No data stored for this query.");
            return Ok(());
        }

        let mut table_rows = Vec::new();
        for row in rows {
            let Ok(record) = serde_json::from_str::<SubCategoryRecord>(&row.data_json) else {
                self.warning(&format!(
                    "Skipping unreadable payload for {}/{}",
                    row.sector_name, row.sub_category
                ));
                continue;
            };
            for ap in &record.action_points {
                table_rows.push(LatestRow {
                    sector: row.sector_name.clone(),
                    sub_category: row.sub_category.clone(),
                    action: ap.action_name.clone(),
                    status: ap.current_status.clone().unwrap_or_else(|| "-".into()),
                    achievement: ap
                        .achievement_percentage
                        .map(|p| format!("{}%", p))
                        .unwrap_or_else(|| "-".into()),
                    version: row.version_date.clone(),
                    source: row.file_name.clone(),
                });
            }
        }
        println!("{}", Table::new(table_rows).with(Style::sharp()));
        Ok(())
    }

    /// Render the version history.
    pub fn history(&self, entries: &[HistoryEntry]) -> Result<()> {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(entries)?);
            return Ok(());
        }
        if entries.is_empty() {
            println!("No history for this district.");
            return Ok(());
        }
        let rows: Vec<HistoryRow> = entries
            .iter()
            .map(|e| HistoryRow {
                version: e.version_date.clone(),
                sector: e.sector_name.clone(),
                sub_category: e.sub_category.clone(),
                document: e.file_name.clone(),
                uploaded_by: e.uploaded_by.clone(),
                latest: if e.is_latest { "yes".into() } else { "".into() },
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::sharp()));
        Ok(())
    }

    /// Render per-sector analytics.
    pub fn analytics(&self, analytics: &BTreeMap<String, f64>) -> Result<()> {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(analytics)?);
            return Ok(());
        }
        if analytics.is_empty() {
            println!("No data stored for this district.");
            return Ok(());
        }
        let rows: Vec<AnalyticsRow> = analytics
            .iter()
            .map(|(sector, value)| AnalyticsRow {
                sector: sector.clone(),
                achievement: format!("{:.2}", value),
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::sharp()));
        Ok(())
    }

    /// Render the sector/sub-category listing.
    pub fn categories(&self, categories: &[CategoryInfo]) -> Result<()> {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(categories)?);
            return Ok(());
        }
        if categories.is_empty() {
            println!("No extracted data yet.");
            return Ok(());
        }
        for category in categories {
            println!("{}", category.sector_name);
            for sub in &category.sub_categories {
                println!("  - {}", sub);
            }
        }
        Ok(())
    }

    /// Render an extraction run report.
    pub fn report(&self, document_id: i64, report: &ExtractionReport) -> Result<()> {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }
        self.success(&format!(
            "Document {}: {} extraction(s) stored/updated.",
            document_id, report.stored_count
        ));
        for error in &report.errors {
            self.warning(&format!("  failed: {}", error));
        }
        Ok(())
    }
}
