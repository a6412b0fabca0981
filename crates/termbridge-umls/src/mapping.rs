//! CUI to target-source code mapping via `GET /content/{version}/CUI/{cui}/atoms`.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use termbridge_core::{Concept, MappingResult, TargetCode, expand_range, validate_identifier};

use crate::Result;
use crate::client::UmlsClient;
use crate::error::UmlsError;

#[derive(Debug, Deserialize)]
struct AtomsResponse {
    #[serde(default)]
    result: Vec<Atom>,
}

#[derive(Debug, Deserialize)]
struct Atom {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    name: String,
    /// UTS sends `"true"`/`"false"` strings; some releases use booleans.
    #[serde(default)]
    obsolete: Option<Value>,
}

impl Atom {
    fn is_obsolete(&self) -> bool {
        match &self.obsolete {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Target codes for this atom, with ranges expanded.
    fn target_codes(&self) -> Vec<TargetCode> {
        let Some(code) = self.code.as_deref() else {
            return Vec::new();
        };
        let code = code_from_uri(code);
        if code.is_empty() {
            return Vec::new();
        }
        expand_range(code)
            .into_iter()
            .map(|code| TargetCode::new(code, self.name.clone()))
            .collect()
    }
}

/// Returns the last path segment of an atom code URI.
///
/// `https://uts-ws.nlm.nih.gov/rest/content/2024AA/source/ICD10CM/J45.909`
/// yields `J45.909`. Bare codes are returned unchanged.
pub fn code_from_uri(uri: &str) -> &str {
    let trimmed = uri.trim().trim_end_matches('/');
    trimmed
        .rsplit_once('/')
        .map_or(trimmed, |(_, last)| last)
}

impl UmlsClient {
    /// Maps a single concept to codes in the configured target source.
    ///
    /// Pages through the atoms endpoint until a short page, a 404, or the
    /// `max_pages` cap. Obsolete atoms are skipped, range codes expanded and
    /// the result deduplicated by code.
    pub async fn map_concept(&self, source: Concept) -> Result<MappingResult> {
        validate_identifier("CUI", &source.code)?;

        let page_size = self.config.page_size;
        let max_pages = self.config.max_pages;
        let mut targets = Vec::new();
        let mut page_number = 1;

        loop {
            let atoms = self.fetch_atoms_page(&source.code, page_number).await?;
            let fetched = atoms.len();

            targets.extend(
                atoms
                    .iter()
                    .filter(|atom| !atom.is_obsolete())
                    .flat_map(Atom::target_codes),
            );

            if fetched < page_size {
                break;
            }
            if page_number >= max_pages {
                tracing::warn!(
                    cui = %source.code,
                    max_pages,
                    "Stopped paginating UMLS atoms at the page limit"
                );
                break;
            }
            page_number += 1;
        }

        let result = MappingResult::from_targets(source, targets);
        tracing::debug!(
            cui = %result.source.code,
            pages = page_number,
            codes = result.targets.len(),
            "Mapped UMLS concept"
        );
        Ok(result)
    }

    /// Maps concepts in order. The first failure aborts the whole batch.
    pub async fn map_concepts<I>(&self, concepts: I) -> Result<Vec<MappingResult>>
    where
        I: IntoIterator<Item = Concept>,
    {
        let mut results = Vec::new();
        for concept in concepts {
            let cui = concept.code.clone();
            let result = self.map_concept(concept).await.inspect_err(|e| {
                tracing::error!(cui = %cui, error = %e, "UMLS mapping failed");
            })?;
            results.push(result);
        }
        tracing::info!(concepts = results.len(), "UMLS mapping completed");
        Ok(results)
    }

    async fn fetch_atoms_page(&self, cui: &str, page_number: usize) -> Result<Vec<Atom>> {
        let url = self.endpoint(&format!(
            "content/{}/CUI/{}/atoms",
            self.config.version, cui
        ));
        let params = [
            ("sabs", self.config.target_source.clone()),
            ("pageNumber", page_number.to_string()),
            ("pageSize", self.config.page_size.to_string()),
        ];

        let response = self.get_with_ticket(&url, &params).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(cui, page_number, "No UMLS atoms in target source");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            tracing::warn!(cui, page_number, status = status.as_u16(), "UMLS atoms request failed");
            return Err(UmlsError::HttpStatus {
                operation: "atoms",
                status: status.as_u16(),
            });
        }

        let body: AtomsResponse = response
            .json()
            .await
            .map_err(|e| UmlsError::Parse(e.to_string()))?;
        Ok(body.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn atom(value: Value) -> Atom {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_code_from_uri() {
        assert_eq!(
            code_from_uri("https://uts-ws.nlm.nih.gov/rest/content/2024AA/source/ICD10CM/A00.9"),
            "A00.9"
        );
        assert_eq!(code_from_uri("J45.909"), "J45.909");
        assert_eq!(code_from_uri("https://x/source/ICD10CM/A00-A09/"), "A00-A09");
    }

    #[test]
    fn test_obsolete_flag_forms() {
        assert!(atom(json!({ "obsolete": "true" })).is_obsolete());
        assert!(atom(json!({ "obsolete": true })).is_obsolete());
        assert!(!atom(json!({ "obsolete": "false" })).is_obsolete());
        assert!(!atom(json!({})).is_obsolete());
    }

    #[test]
    fn test_range_atom_expands_with_shared_description() {
        let atom = atom(json!({
            "code": "https://uts/source/ICD10CM/A00-A02",
            "name": "Cholera and other intestinal infections"
        }));
        let targets = atom.target_codes();
        assert_eq!(
            targets.iter().map(|t| t.code.as_str()).collect::<Vec<_>>(),
            vec!["A00", "A01", "A02"]
        );
        assert!(
            targets
                .iter()
                .all(|t| t.description == "Cholera and other intestinal infections")
        );
    }

    #[test]
    fn test_atom_without_code_yields_nothing() {
        assert!(atom(json!({ "name": "orphan" })).target_codes().is_empty());
    }

    #[test]
    fn test_atoms_response_parses_missing_result() {
        let body: AtomsResponse = serde_json::from_value(json!({ "pageSize": 25 })).unwrap();
        assert!(body.result.is_empty());
    }
}
