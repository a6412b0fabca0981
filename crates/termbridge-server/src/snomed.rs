//! SNOMED CT search, ICD-10 mapping and export (`/app2/snomed/*`).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use termbridge_api::{ApiError, ExportResponse};
use termbridge_core::{Concept, MappingResult, TargetCode};
use termbridge_export::{MappingRow, file_name_for_term};

use crate::error::Result;
use crate::server::AppState;
use crate::session::{self, DOWNLOAD_PATH};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnomedHit {
    pub ui: String,
    pub name: String,
}

/// A selected concept: a bare CUI or a search hit echoed back.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SelectedConcept {
    Id(String),
    Hit {
        ui: String,
        #[serde(default)]
        name: String,
    },
}

impl From<SelectedConcept> for Concept {
    fn from(selected: SelectedConcept) -> Self {
        match selected {
            SelectedConcept::Id(ui) => Concept::new(ui.trim(), ""),
            SelectedConcept::Hit { ui, name } => Concept::new(ui.trim(), name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MapRequest {
    #[serde(default)]
    pub selected_ids: Vec<SelectedConcept>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub selected_ids: Vec<SelectedConcept>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MappedConcept {
    pub snomed_id: String,
    pub name: String,
    pub icd10: Vec<TargetCode>,
}

impl From<MappingResult> for MappedConcept {
    fn from(result: MappingResult) -> Self {
        Self {
            snomed_id: result.source.code,
            name: result.source.name,
            icd10: result.targets,
        }
    }
}

/// `POST /app2/snomed/search`
pub async fn search(
    State(state): State<AppState>,
    body: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<SnomedHit>>> {
    let Json(request) = body?;
    let term = request.term.trim();
    if term.is_empty() {
        return Err(ApiError::bad_request("Search term is required").into());
    }

    let hits = state
        .umls
        .search_terms(term)
        .await?
        .into_iter()
        .map(|concept| SnomedHit {
            ui: concept.code,
            name: concept.name,
        })
        .collect();
    Ok(Json(hits))
}

/// `POST /app2/snomed/map`
pub async fn map(
    State(state): State<AppState>,
    body: std::result::Result<Json<MapRequest>, JsonRejection>,
) -> Result<Json<Vec<MappedConcept>>> {
    let Json(request) = body?;
    let results = map_selected(&state, request.selected_ids).await?;
    Ok(Json(results.into_iter().map(MappedConcept::from).collect()))
}

/// `POST /app2/snomed/export`: maps the selection and writes `<term>.xlsx`.
pub async fn export(
    State(state): State<AppState>,
    jar: CookieJar,
    body: std::result::Result<Json<ExportRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ExportResponse>)> {
    let Json(request) = body?;
    let term = request.term.trim().to_string();
    if term.is_empty() {
        return Err(ApiError::bad_request("Search term is required").into());
    }

    let results = map_selected(&state, request.selected_ids).await?;
    let rows = MappingRow::from_results(&term, &results);

    let (jar, session) = session::ensure_session(jar);
    let format = state.export_format;
    let file = state
        .sessions
        .write_export(session, file_name_for_term(&term, format), format, rows)
        .await?;

    tracing::info!(concepts = results.len(), file = %file.file_name, "Mapping export generated");
    Ok((jar, Json(ExportResponse::generated(DOWNLOAD_PATH, file.file_name))))
}

async fn map_selected(
    state: &AppState,
    selected: Vec<SelectedConcept>,
) -> Result<Vec<MappingResult>> {
    if selected.is_empty() {
        return Err(ApiError::bad_request("No concepts selected").into());
    }
    let concepts: Vec<Concept> = selected.into_iter().map(Concept::from).collect();
    Ok(state.umls.map_concepts(concepts).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selected_concepts_accept_both_shapes() {
        let request: MapRequest = serde_json::from_value(json!({
            "selected_ids": ["C0004096", { "ui": "C0038218", "name": "Status asthmaticus" }]
        }))
        .unwrap();

        let concepts: Vec<Concept> = request.selected_ids.into_iter().map(Concept::from).collect();
        assert_eq!(concepts[0], Concept::new("C0004096", ""));
        assert_eq!(concepts[1], Concept::new("C0038218", "Status asthmaticus"));
    }

    #[test]
    fn test_mapped_concept_shape() {
        let result = MappingResult::from_targets(
            Concept::new("C0004096", "Asthma"),
            vec![TargetCode::new("J45.909", "Unspecified asthma, uncomplicated")],
        );
        let body = serde_json::to_value(MappedConcept::from(result)).unwrap();
        assert_eq!(
            body,
            json!({
                "snomed_id": "C0004096",
                "name": "Asthma",
                "icd10": [{ "code": "J45.909", "description": "Unspecified asthma, uncomplicated" }]
            })
        );
    }
}
