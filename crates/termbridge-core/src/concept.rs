use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// UMLS source abbreviations used by termbridge.
pub mod systems {
    pub const SNOMEDCT_US: &str = "SNOMEDCT_US";
    pub const ICD10CM: &str = "ICD10CM";
}

/// A code and its human-readable name from one coding system.
///
/// For UMLS search hits `code` is the CUI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl Concept {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            system: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A resolved code in the target coding system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCode {
    pub code: String,
    pub description: String,
}

impl TargetCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// One source concept and the target codes it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    pub source: Concept,
    pub targets: Vec<TargetCode>,
}

impl MappingResult {
    pub fn new(source: Concept) -> Self {
        Self {
            source,
            targets: Vec::new(),
        }
    }

    /// Builds a result from targets, keeping the first target for each code.
    pub fn from_targets<I>(source: Concept, targets: I) -> Self
    where
        I: IntoIterator<Item = TargetCode>,
    {
        let mut seen = HashSet::new();
        let targets = targets
            .into_iter()
            .filter(|t| seen.insert(t.code.clone()))
            .collect();
        Self { source, targets }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_targets_dedupes_by_code() {
        let result = MappingResult::from_targets(
            Concept::new("C0004096", "Asthma"),
            vec![
                TargetCode::new("J45", "Asthma"),
                TargetCode::new("J45.909", "Unspecified asthma"),
                TargetCode::new("J45", "Asthma (duplicate atom)"),
            ],
        );
        assert_eq!(result.codes().collect::<Vec<_>>(), vec!["J45", "J45.909"]);
        assert_eq!(result.targets[0].description, "Asthma");
    }

    #[test]
    fn concept_serializes_without_empty_system() {
        let json = serde_json::to_value(Concept::new("C1", "x")).unwrap();
        assert!(json.get("system").is_none());

        let json =
            serde_json::to_value(Concept::new("C1", "x").with_system(systems::SNOMEDCT_US)).unwrap();
        assert_eq!(json["system"], "SNOMEDCT_US");
    }
}
