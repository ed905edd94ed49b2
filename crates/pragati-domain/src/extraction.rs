//! Wire shapes the LLM is prompted to emit for one extraction run.

use crate::record::{ActionPoint, SubCategoryRecord};
use serde::{Deserialize, Serialize};

/// One sub-category block as emitted by the model.
///
/// Two envelope generations exist in the wild: the current one nests the
/// content under `information`, the legacy one puts `action_points`
/// directly on the sub-category. Both deserialize; [`SubCategory::into_record`]
/// normalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    /// Predefined sub-category label.
    pub sub_category_name: String,

    /// Legacy shape: action points directly on the sub-category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_points: Option<Vec<ActionPoint>>,

    /// Current shape: action points plus additional details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<SubCategoryRecord>,
}

impl SubCategory {
    /// Collapse either envelope generation into one record.
    pub fn into_record(self) -> SubCategoryRecord {
        if let Some(information) = self.information {
            return information;
        }
        SubCategoryRecord {
            action_points: self.action_points.unwrap_or_default(),
            additional_details: Default::default(),
        }
    }
}

/// One sector block as emitted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Predefined sector label.
    pub sector_name: String,

    /// Sub-categories with data found in the document.
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

/// What one extraction run produces: the unit the pipeline merges and
/// persists per (sector, sub-category) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredExtraction {
    /// District the document belongs to.
    pub district: String,

    /// Upload date in `YYYY-MM-DD` form.
    pub upload_date: String,

    /// Sectors with data found in the document.
    #[serde(default)]
    pub sectors: Vec<Sector>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_envelope_parses() {
        let json = r#"{
            "district": "Tawang",
            "upload_date": "2025-06-01",
            "sectors": [{
                "sector_name": "Swasth Arunachal: Health",
                "sub_categories": [{
                    "sub_category_name": "One District One Health Theme",
                    "information": {
                        "action_points": [{"action_name": "One District One Health Theme"}],
                        "additional_details": {"theme": "maternal care"}
                    }
                }]
            }]
        }"#;
        let extraction: StructuredExtraction = serde_json::from_str(json).unwrap();
        let record = extraction.sectors[0].sub_categories[0].clone().into_record();
        assert_eq!(record.action_points.len(), 1);
        assert_eq!(record.additional_details["theme"], "maternal care");
    }

    #[test]
    fn test_legacy_envelope_parses() {
        let json = r#"{
            "district": "Tawang",
            "upload_date": "2025-06-01",
            "sectors": [{
                "sector_name": "Unnat Krishi: Agriculture",
                "sub_categories": [{
                    "sub_category_name": "One District, One Product",
                    "action_points": [{"action_name": "One District, One Product"}]
                }]
            }]
        }"#;
        let extraction: StructuredExtraction = serde_json::from_str(json).unwrap();
        let record = extraction.sectors[0].sub_categories[0].clone().into_record();
        assert_eq!(record.action_points.len(), 1);
        assert!(record.additional_details.is_empty());
    }

    #[test]
    fn test_missing_sectors_defaults_empty() {
        let extraction: StructuredExtraction =
            serde_json::from_str(r#"{"district": "Tawang", "upload_date": "2025-06-01"}"#).unwrap();
        assert!(extraction.sectors.is_empty());
    }
}
