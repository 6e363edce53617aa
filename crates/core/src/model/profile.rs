use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Patient profile with the EMR fields the dashboard displays.
///
/// Fields the client does not model are kept in `extra` so they can still be
/// listed in the EMR card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub insurance: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PatientProfile {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Result of an EMR PDF upload once the backend extracted its fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmrUploadSummary {
    pub summary: String,
    #[serde(default)]
    pub extracted_data: Map<String, Value>,
}
