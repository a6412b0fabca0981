//! VSAC value set search, view and export.

use axum::{
    Form, Json,
    extract::{
        Path, State,
        rejection::{FormRejection, JsonRejection},
    },
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::Value;
use termbridge_api::{ApiError, ExportResponse};
use termbridge_core::ValueSetSummary;
use termbridge_export::ValueSetRow;
use termbridge_vsac::VsacError;

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::session::{self, DOWNLOAD_PATH};

const VALUE_SETS_FILE_STEM: &str = "value_sets";

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub term: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    #[serde(default)]
    pub selected_ids: Vec<String>,
}

/// `POST /search` (form `term`)
pub async fn search(
    State(state): State<AppState>,
    body: std::result::Result<Form<SearchForm>, FormRejection>,
) -> Result<Json<Vec<ValueSetSummary>>> {
    let Form(form) = body?;
    let term = form.term.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(ApiError::bad_request("Search term is required").into());
    }

    let value_sets = state.vsac.search_value_sets(term).await?;
    if value_sets.is_empty() {
        return Err(ApiError::bad_request("No value sets found").into());
    }
    Ok(Json(value_sets))
}

/// `GET /view/{value_set_id}`: the ValueSet resource, or VSAC's error status.
pub async fn view(
    State(state): State<AppState>,
    Path(value_set_id): Path<String>,
) -> Result<Json<Value>> {
    match state.vsac.read_value_set(&value_set_id).await {
        Ok(resource) => Ok(Json(resource)),
        Err(VsacError::HttpStatus { status, .. }) => Err(ApiError::upstream(
            status,
            format!("Error fetching details: {status}"),
        )
        .into()),
        Err(e) => Err(e.into()),
    }
}

/// `POST /retrieve`: expands the selected value sets into the session file.
pub async fn retrieve(
    State(state): State<AppState>,
    jar: CookieJar,
    body: std::result::Result<Json<RetrieveRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ExportResponse>)> {
    let Json(request) = body?;
    if request.selected_ids.is_empty() {
        return Err(ApiError::bad_request("No value sets selected").into());
    }

    let mut rows = Vec::new();
    for oid in &request.selected_ids {
        let concepts = state.vsac.expand_value_set(oid).await.map_err(|e| match e {
            VsacError::HttpStatus { status, body } => {
                tracing::error!(value_set = %oid, status, "VSAC expansion failed");
                ApiError::bad_gateway(format!("Error fetching data for {oid}: {body}")).into()
            }
            other => AppError::from(other),
        })?;
        rows.extend(ValueSetRow::from_concepts(oid, &concepts));
    }

    let (jar, session) = session::ensure_session(jar);
    let format = state.export_format;
    let file_name = format!("{VALUE_SETS_FILE_STEM}.{}", format.extension());
    let file = state
        .sessions
        .write_export(session, file_name, format, rows)
        .await?;

    tracing::info!(
        value_sets = request.selected_ids.len(),
        file = %file.file_name,
        "Value set export generated"
    );
    Ok((jar, Json(ExportResponse::generated(DOWNLOAD_PATH, file.file_name))))
}
