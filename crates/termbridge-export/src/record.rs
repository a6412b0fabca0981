use termbridge_core::{MappingResult, ValueSetConcept};

/// A row type that can be written by [`crate::ExportWriter`].
pub trait ExportRecord {
    /// Worksheet name used for `.xlsx` output.
    const SHEET_NAME: &'static str;

    fn headers() -> &'static [&'static str];

    /// Cell values, one per header.
    fn cells(&self) -> Vec<String>;
}

/// One expanded code of a VSAC value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetRow {
    pub value_set_oid: String,
    pub code: String,
    pub display: String,
}

impl ValueSetRow {
    pub fn from_concepts(value_set_oid: &str, concepts: &[ValueSetConcept]) -> Vec<Self> {
        concepts
            .iter()
            .map(|concept| Self {
                value_set_oid: value_set_oid.to_string(),
                code: concept.code.clone(),
                display: concept.display.clone().unwrap_or_default(),
            })
            .collect()
    }
}

impl ExportRecord for ValueSetRow {
    const SHEET_NAME: &'static str = "Value Sets";

    fn headers() -> &'static [&'static str] {
        &["Value Set OID", "Code", "Display"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.value_set_oid.clone(),
            self.code.clone(),
            self.display.clone(),
        ]
    }
}

/// One SNOMED CT concept paired with one of its ICD-10 codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub search_term: String,
    pub concept_id: String,
    pub concept_name: String,
    pub icd10_code: String,
    pub icd10_description: String,
}

impl MappingRow {
    /// Flattens mapping results. A concept without targets still gets a row
    /// with empty ICD-10 cells.
    pub fn from_results(search_term: &str, results: &[MappingResult]) -> Vec<Self> {
        let mut rows = Vec::new();
        for result in results {
            let row = |code: &str, description: &str| Self {
                search_term: search_term.to_string(),
                concept_id: result.source.code.clone(),
                concept_name: result.source.name.clone(),
                icd10_code: code.to_string(),
                icd10_description: description.to_string(),
            };
            if result.targets.is_empty() {
                rows.push(row("", ""));
            } else {
                rows.extend(
                    result
                        .targets
                        .iter()
                        .map(|t| row(&t.code, &t.description)),
                );
            }
        }
        rows
    }
}

impl ExportRecord for MappingRow {
    const SHEET_NAME: &'static str = "ICD-10 Mappings";

    fn headers() -> &'static [&'static str] {
        &[
            "Search Term",
            "Concept CUI",
            "Concept Name",
            "ICD-10 Code",
            "ICD-10 Description",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.search_term.clone(),
            self.concept_id.clone(),
            self.concept_name.clone(),
            self.icd10_code.clone(),
            self.icd10_description.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termbridge_core::{Concept, TargetCode};

    #[test]
    fn mapping_rows_include_unmapped_concepts() {
        let results = vec![
            MappingResult::from_targets(
                Concept::new("C0004096", "Asthma"),
                vec![
                    TargetCode::new("J45.909", "Unspecified asthma"),
                    TargetCode::new("J45.998", "Other asthma"),
                ],
            ),
            MappingResult::new(Concept::new("C0000001", "Unmapped")),
        ];

        let rows = MappingRow::from_results("asthma", &results);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].icd10_code, "J45.909");
        assert_eq!(rows[1].concept_name, "Asthma");
        assert_eq!(
            rows[2].cells(),
            vec!["asthma", "C0000001", "Unmapped", "", ""]
        );
    }

    #[test]
    fn value_set_rows_default_missing_display() {
        let concepts = vec![ValueSetConcept {
            code: "44054006".into(),
            display: None,
            system: Some("http://snomed.info/sct".into()),
        }];
        let rows = ValueSetRow::from_concepts("2.16.1", &concepts);
        assert_eq!(rows[0].cells(), vec!["2.16.1", "44054006", ""]);
        assert_eq!(ValueSetRow::headers().len(), rows[0].cells().len());
    }
}
