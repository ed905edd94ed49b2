//! Row shapes returned by the versioned store.

use serde::Serialize;

/// One stored extraction snapshot, joined with its source document name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRow {
    /// Row id.
    pub id: i64,

    /// Document the snapshot was extracted from.
    pub document_id: i64,

    /// Owning district.
    pub district_id: i64,

    /// Sector label.
    pub sector_name: String,

    /// Sub-category label.
    pub sub_category: String,

    /// Serialized [`crate::SubCategoryRecord`] payload.
    pub data_json: String,

    /// Version date (`YYYY-MM-DD`), the upload date of the superseding run.
    pub version_date: String,

    /// Whether this is the authoritative snapshot for its key.
    pub is_latest: bool,

    /// Original filename of the source document.
    pub file_name: String,
}

/// A district with its document count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictInfo {
    /// District id.
    pub id: i64,

    /// Unique district name.
    pub name: String,

    /// Number of documents uploaded for the district.
    pub document_count: i64,
}

/// One entry in a district's version history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Source document id.
    pub document_id: i64,

    /// Source document filename.
    pub file_name: String,

    /// When the document was uploaded.
    pub upload_date: String,

    /// Who uploaded the document.
    pub uploaded_by: String,

    /// Sector label.
    pub sector_name: String,

    /// Sub-category label.
    pub sub_category: String,

    /// Version date of the snapshot.
    pub version_date: String,

    /// Whether the snapshot is still the latest for its key.
    pub is_latest: bool,
}

/// One uploaded document, joined with its owning district's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRow {
    /// Document id.
    pub id: i64,

    /// Owning district id.
    pub district_id: i64,

    /// Owning district name.
    pub district_name: String,

    /// Original filename.
    pub file_name: String,

    /// Where the uploaded file was stored.
    pub file_path: String,

    /// Upload date (`YYYY-MM-DD`).
    pub upload_date: String,

    /// Who uploaded the document.
    pub uploaded_by: String,

    /// Already-decoded plain text of the document.
    pub raw_text: String,
}

/// A sector with the sub-categories that currently have data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    /// Sector label.
    pub sector_name: String,

    /// Sub-categories with at least one latest snapshot.
    pub sub_categories: Vec<String>,
}

/// Outcome of deleting a district and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteReport {
    /// Documents removed.
    pub deleted_documents: usize,

    /// Extraction snapshots removed (latest and historical).
    pub deleted_extractions: usize,
}
