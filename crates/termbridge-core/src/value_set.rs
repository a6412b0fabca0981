use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Summary of a VSAC value set as listed by a search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueSetSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl ValueSetSummary {
    /// Reads the summary fields from a ValueSet resource.
    pub fn from_resource(resource: &Value) -> Self {
        let field = |name: &str| {
            resource
                .get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        Self {
            id: field("id"),
            name: field("name"),
            title: field("title"),
            url: field("url"),
        }
    }
}

/// One entry of a ValueSet `$expand` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSetConcept {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl ValueSetConcept {
    /// Reads an `expansion.contains[]` entry. Entries without a code are skipped.
    pub fn from_contains(entry: &Value) -> Option<Self> {
        let code = entry.get("code")?.as_str()?.to_string();
        Some(Self {
            code,
            display: entry
                .get("display")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            system: entry
                .get("system")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }
}
