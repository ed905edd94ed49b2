//! The persisted record shapes: action points and sub-category records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One named fact/status entry within a sub-category.
///
/// Identity within a record is `action_name` (case-sensitive exact match);
/// two action points with the same name are the same fact and get merged,
/// never duplicated. All other fields are optional extracted evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPoint {
    /// Predefined sub-category label this fact belongs to. The taxonomy is
    /// an external enumeration; the name is passed through, not validated.
    pub action_name: String,

    /// Status inferred from the document ("In Progress", "Completed", ...)
    #[serde(default)]
    pub current_status: Option<String>,

    /// Achievement percentage, 0-100 expected but not enforced.
    #[serde(default, deserialize_with = "percentage_lenient")]
    pub achievement_percentage: Option<f64>,

    /// Where the document says the figure comes from.
    #[serde(default)]
    pub data_source: Option<String>,

    /// Any additional notes from the document.
    #[serde(default)]
    pub remarks: Option<String>,
}

impl ActionPoint {
    /// Create an action point carrying only a name.
    pub fn named(action_name: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            current_status: None,
            achievement_percentage: None,
            data_source: None,
            remarks: None,
        }
    }
}

/// LLM output writes percentages as numbers or as numeric strings
/// ("75", "75.5%"). Accept both; anything else becomes None rather than
/// failing the whole record.
fn percentage_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// The content stored per (district, sector, sub-category) key.
///
/// This exact shape is the persisted wire contract consumed by downstream
/// analytics and chat, and must round-trip losslessly through JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubCategoryRecord {
    /// Action points, unique by `action_name`, in insertion order.
    #[serde(default)]
    pub action_points: Vec<ActionPoint>,

    /// Everything else the document said about the sub-category, keyed by
    /// descriptive names the model chose.
    #[serde(default)]
    pub additional_details: Map<String, Value>,
}

impl SubCategoryRecord {
    /// True when the record carries no action points.
    pub fn is_empty(&self) -> bool {
        self.action_points.is_empty()
    }

    /// Look up an action point by name.
    pub fn action_point(&self, name: &str) -> Option<&ActionPoint> {
        self.action_points.iter().find(|ap| ap.action_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_accepts_number() {
        let ap: ActionPoint =
            serde_json::from_str(r#"{"action_name": "X", "achievement_percentage": 75}"#).unwrap();
        assert_eq!(ap.achievement_percentage, Some(75.0));
    }

    #[test]
    fn test_percentage_accepts_numeric_string() {
        let ap: ActionPoint =
            serde_json::from_str(r#"{"action_name": "X", "achievement_percentage": "62.5"}"#)
                .unwrap();
        assert_eq!(ap.achievement_percentage, Some(62.5));

        let ap: ActionPoint =
            serde_json::from_str(r#"{"action_name": "X", "achievement_percentage": "80%"}"#)
                .unwrap();
        assert_eq!(ap.achievement_percentage, Some(80.0));
    }

    #[test]
    fn test_percentage_garbage_becomes_none() {
        let ap: ActionPoint = serde_json::from_str(
            r#"{"action_name": "X", "achievement_percentage": "not available"}"#,
        )
        .unwrap();
        assert_eq!(ap.achievement_percentage, None);
    }

    #[test]
    fn test_missing_optionals_default_to_none() {
        let ap: ActionPoint = serde_json::from_str(r#"{"action_name": "X"}"#).unwrap();
        assert_eq!(ap.current_status, None);
        assert_eq!(ap.data_source, None);
        assert_eq!(ap.remarks, None);
    }

    #[test]
    fn test_record_round_trips() {
        let mut details = Map::new();
        details.insert("target_beneficiaries".to_string(), Value::from(1200));
        details.insert("coverage".to_string(), Value::from("full"));

        let record = SubCategoryRecord {
            action_points: vec![ActionPoint {
                action_name: "Doorstep Delivery of Scheme Benefits".to_string(),
                current_status: Some("In Progress".to_string()),
                achievement_percentage: Some(40.0),
                data_source: None,
                remarks: Some("monthly camps ongoing".to_string()),
            }],
            additional_details: details,
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: SubCategoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn test_serialized_shape_keeps_null_fields() {
        let record = SubCategoryRecord {
            action_points: vec![ActionPoint::named("X")],
            additional_details: Map::new(),
        };
        let json = serde_json::to_value(&record).unwrap();
        let ap = &json["action_points"][0];
        assert!(ap["current_status"].is_null());
        assert!(ap["achievement_percentage"].is_null());
        assert!(json["additional_details"].is_object());
    }
}
