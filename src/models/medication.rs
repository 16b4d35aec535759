use serde::{Deserialize, Serialize};

/// A reference medication record. `name` is the catalog identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contraindications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precautions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pharmaceutical_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentations: Option<String>,
}

impl Medication {
    /// A record carrying only its name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            clinical_use: None,
            dosage: None,
            contraindications: None,
            precautions: None,
            side_effects: None,
            interactions: None,
            pharmaceutical_data: None,
            presentations: None,
        }
    }
}
