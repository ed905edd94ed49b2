//! Pragati Storage Layer
//!
//! SQLite implementation of the `ExtractionStore` trait from
//! `pragati-domain`.
//!
//! # Consistency contract
//!
//! Superseding the latest snapshot for a (district, sector, sub-category)
//! key is one SQLite transaction: flip every prior row for the key to
//! `is_latest = 0`, then insert the new row with `is_latest = 1`. A crash
//! between the two statements rolls the flip back, so a key never ends up
//! with zero latest rows when it had one before, nor with two after.
//!
//! # Thread Safety
//!
//! SQLite connections are not thread-safe; callers share a store behind a
//! mutex (see the pipeline in `pragati-extractor`).
//!
//! # Examples
//!
//! ```no_run
//! use pragati_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is ready for extraction operations
//! ```

#![warn(missing_docs)]

use pragati_domain::traits::ExtractionStore;
use pragati_domain::{
    CategoryInfo, DeleteReport, DistrictInfo, DocumentRow, ExtractionRow, HistoryEntry,
    SubCategoryRecord,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record payload serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// SQLite-based implementation of `ExtractionStore`
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn district_id(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM districts WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }
}

impl ExtractionStore for SqliteStore {
    type Error = StoreError;

    fn get_or_create_district(&mut self, name: &str) -> Result<i64, Self::Error> {
        if let Some(id) = self.district_id(name)? {
            return Ok(id);
        }
        self.conn
            .execute("INSERT INTO districts (name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_document(
        &mut self,
        district_id: i64,
        file_name: &str,
        file_path: &str,
        upload_date: &str,
        uploaded_by: &str,
        raw_text: &str,
    ) -> Result<i64, Self::Error> {
        self.conn.execute(
            "INSERT INTO documents (district_id, file_name, file_path, upload_date, uploaded_by, raw_text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![district_id, file_name, file_path, upload_date, uploaded_by, raw_text],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn document(&self, document_id: i64) -> Result<Option<DocumentRow>, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT doc.id, doc.district_id, d.name, doc.file_name, doc.file_path,
                        doc.upload_date, doc.uploaded_by, doc.raw_text
                 FROM documents doc
                 JOIN districts d ON doc.district_id = d.id
                 WHERE doc.id = ?1",
                params![document_id],
                |row| {
                    Ok(DocumentRow {
                        id: row.get(0)?,
                        district_id: row.get(1)?,
                        district_name: row.get(2)?,
                        file_name: row.get(3)?,
                        file_path: row.get(4)?,
                        upload_date: row.get(5)?,
                        uploaded_by: row.get(6)?,
                        raw_text: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn store_latest(
        &mut self,
        document_id: i64,
        district_id: i64,
        sector_name: &str,
        sub_category: &str,
        record: &SubCategoryRecord,
        version_date: &str,
    ) -> Result<i64, Self::Error> {
        let data_json = serde_json::to_string(record)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE extractions
             SET is_latest = 0
             WHERE district_id = ?1 AND sector_name = ?2 AND sub_category = ?3",
            params![district_id, sector_name, sub_category],
        )?;
        tx.execute(
            "INSERT INTO extractions
                 (document_id, district_id, sector_name, sub_category, data_json, version_date, is_latest)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
            params![document_id, district_id, sector_name, sub_category, data_json, version_date],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(
            "Stored latest snapshot {} for {}/{}",
            id, sector_name, sub_category
        );
        Ok(id)
    }

    fn read_latest(
        &self,
        district_name: &str,
        sector_name: Option<&str>,
        sub_category: Option<&str>,
    ) -> Result<Vec<ExtractionRow>, Self::Error> {
        let Some(district_id) = self.district_id(district_name)? else {
            return Ok(Vec::new());
        };

        let mut sql = String::from(
            "SELECT e.id, e.document_id, e.district_id, e.sector_name, e.sub_category,
                    e.data_json, e.version_date, e.is_latest, doc.file_name
             FROM extractions e
             JOIN documents doc ON e.document_id = doc.id
             WHERE e.district_id = ? AND e.is_latest = 1",
        );
        let mut bindings: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(district_id)];

        if let Some(sector) = sector_name {
            sql.push_str(" AND e.sector_name = ?");
            bindings.push(Box::new(sector.to_string()));
        }
        if let Some(sub) = sub_category {
            sql.push_str(" AND e.sub_category = ?");
            bindings.push(Box::new(sub.to_string()));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let binding_refs: Vec<&dyn rusqlite::ToSql> = bindings.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(&binding_refs[..], |row| {
            Ok(ExtractionRow {
                id: row.get(0)?,
                document_id: row.get(1)?,
                district_id: row.get(2)?,
                sector_name: row.get(3)?,
                sub_category: row.get(4)?,
                data_json: row.get(5)?,
                version_date: row.get(6)?,
                is_latest: row.get::<_, i64>(7)? != 0,
                file_name: row.get(8)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn read_history(&self, district_name: &str) -> Result<Vec<HistoryEntry>, Self::Error> {
        let Some(district_id) = self.district_id(district_name)? else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(
            "SELECT doc.id, doc.file_name, doc.upload_date, doc.uploaded_by,
                    e.sector_name, e.sub_category, e.version_date, e.is_latest
             FROM extractions e
             JOIN documents doc ON e.document_id = doc.id
             WHERE e.district_id = ?1
             ORDER BY e.version_date DESC, e.sector_name, e.sub_category",
        )?;
        let rows = stmt.query_map(params![district_id], |row| {
            Ok(HistoryEntry {
                document_id: row.get(0)?,
                file_name: row.get(1)?,
                upload_date: row.get(2)?,
                uploaded_by: row.get(3)?,
                sector_name: row.get(4)?,
                sub_category: row.get(5)?,
                version_date: row.get(6)?,
                is_latest: row.get::<_, i64>(7)? != 0,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn list_districts(&self) -> Result<Vec<DistrictInfo>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.name, COUNT(DISTINCT doc.id) AS document_count
             FROM districts d
             LEFT JOIN documents doc ON d.id = doc.district_id
             GROUP BY d.id, d.name
             ORDER BY d.name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DistrictInfo {
                id: row.get(0)?,
                name: row.get(1)?,
                document_count: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn district_names(&self) -> Result<Vec<String>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM districts ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn list_categories(&self) -> Result<Vec<CategoryInfo>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT sector_name, sub_category
             FROM extractions
             WHERE is_latest = 1
             ORDER BY sector_name, sub_category",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut categories: Vec<CategoryInfo> = Vec::new();
        for row in rows {
            let (sector, sub) = row?;
            match categories.iter_mut().find(|c| c.sector_name == sector) {
                Some(entry) => entry.sub_categories.push(sub),
                None => categories.push(CategoryInfo {
                    sector_name: sector,
                    sub_categories: vec![sub],
                }),
            }
        }
        Ok(categories)
    }

    fn district_analytics(
        &self,
        district_name: &str,
    ) -> Result<BTreeMap<String, f64>, Self::Error> {
        struct SectorStats {
            sum_percentage: f64,
            count: usize,
        }

        let rows = self.read_latest(district_name, None, None)?;
        let mut stats: BTreeMap<String, SectorStats> = BTreeMap::new();

        for row in rows {
            let entry = stats.entry(row.sector_name.clone()).or_insert(SectorStats {
                sum_percentage: 0.0,
                count: 0,
            });

            // A payload that fails to parse contributes nothing, same as a
            // row with no percentages.
            let Ok(record) = serde_json::from_str::<SubCategoryRecord>(&row.data_json) else {
                continue;
            };
            for ap in &record.action_points {
                if let Some(percentage) = ap.achievement_percentage {
                    entry.sum_percentage += percentage;
                    entry.count += 1;
                }
            }
        }

        let mut analytics = BTreeMap::new();
        for (sector, s) in stats {
            let value = if s.count > 0 {
                (s.sum_percentage / s.count as f64 * 100.0).round() / 100.0
            } else {
                // Action points exist but none carry a percentage.
                0.0
            };
            analytics.insert(sector, value);
        }
        Ok(analytics)
    }

    fn delete_district(&mut self, name: &str) -> Result<Option<DeleteReport>, Self::Error> {
        let Some(district_id) = self.district_id(name)? else {
            return Ok(None);
        };

        let tx = self.conn.transaction()?;
        let deleted_extractions = tx.execute(
            "DELETE FROM extractions WHERE district_id = ?1",
            params![district_id],
        )?;
        let deleted_documents = tx.execute(
            "DELETE FROM documents WHERE district_id = ?1",
            params![district_id],
        )?;
        tx.execute("DELETE FROM districts WHERE id = ?1", params![district_id])?;
        tx.commit()?;

        Ok(Some(DeleteReport {
            deleted_documents,
            deleted_extractions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pragati_domain::ActionPoint;

    fn record_with(name: &str, percentage: Option<f64>) -> SubCategoryRecord {
        SubCategoryRecord {
            action_points: vec![ActionPoint {
                action_name: name.to_string(),
                current_status: Some("In Progress".to_string()),
                achievement_percentage: percentage,
                data_source: None,
                remarks: None,
            }],
            additional_details: Default::default(),
        }
    }

    #[test]
    fn test_get_or_create_district_is_idempotent() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let first = store.get_or_create_district("Tawang").unwrap();
        let second = store.get_or_create_district("Tawang").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_read_latest_unknown_district_is_empty() {
        let store = SqliteStore::new(":memory:").unwrap();
        let rows = store.read_latest("Nowhere", None, None).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_store_latest_round_trips_payload() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let district_id = store.get_or_create_district("Tawang").unwrap();
        let document_id = store
            .create_document(district_id, "report.pdf", "/tmp/report.pdf", "2025-06-01", "admin", "text")
            .unwrap();

        let record = record_with("One District One Health Theme", Some(62.5));
        store
            .store_latest(
                document_id,
                district_id,
                "Swasth Arunachal: Health",
                "One District One Health Theme",
                &record,
                "2025-06-01",
            )
            .unwrap();

        let rows = store.read_latest("Tawang", None, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file_name, "report.pdf");

        let parsed: SubCategoryRecord = serde_json::from_str(&rows[0].data_json).unwrap();
        assert_eq!(parsed, record);
    }
}
