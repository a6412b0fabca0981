use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use serde_json::json;
use termbridge_api::ApiError;

use crate::error::Result;
use crate::server::AppState;
use crate::session;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "termbridge",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

/// `GET /retrieve/download`: the session's last generated file.
pub async fn download(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse> {
    let file = session::session_id(&jar)
        .and_then(|id| state.sessions.get(&id))
        .ok_or_else(|| ApiError::not_found("No file available for download"))?;

    let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
        tracing::warn!(path = %file.path.display(), error = %e, "Generated file is gone");
        ApiError::not_found("No file available for download")
    })?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
