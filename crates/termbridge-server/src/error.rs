use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::response::{IntoResponse, Response};
use termbridge_api::ApiError;
use termbridge_export::ExportError;
use termbridge_umls::UmlsError;
use termbridge_vsac::VsacError;

use crate::git_sync::GitSyncError;

/// Error type returned by every handler.
///
/// Library errors are converted to an [`ApiError`] at the response boundary;
/// server-side failures are logged there.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error(transparent)]
    Form(#[from] FormRejection),
    #[error(transparent)]
    Umls(#[from] UmlsError),
    #[error(transparent)]
    Vsac(#[from] VsacError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    GitSync(#[from] GitSyncError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn to_api_error(&self) -> ApiError {
        match self {
            Self::Api(e) => e.clone(),
            Self::Json(e) => ApiError::invalid_request(e.status(), e.body_text()),
            Self::Form(e) => ApiError::invalid_request(e.status(), e.body_text()),
            Self::Umls(e) if e.is_client_error() => ApiError::bad_request(e.to_string()),
            Self::Umls(e) if e.is_upstream_error() => ApiError::bad_gateway(e.to_string()),
            Self::Umls(e) => ApiError::internal(e.to_string()),
            Self::Vsac(VsacError::NoEntries) => ApiError::bad_request(VsacError::NoEntries.to_string()),
            Self::Vsac(e) if e.is_client_error() => ApiError::bad_request(e.to_string()),
            Self::Vsac(e) if e.is_upstream_error() => ApiError::bad_gateway(e.to_string()),
            Self::Vsac(e) => ApiError::internal(e.to_string()),
            Self::GitSync(GitSyncError::Disabled) => {
                ApiError::service_unavailable(GitSyncError::Disabled.to_string())
            }
            Self::GitSync(_) => ApiError::internal("Git sync failed"),
            Self::Export(_) => ApiError::internal("Failed to generate file"),
            Self::Io(_) | Self::Join(_) => ApiError::internal("Internal server error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let api = self.to_api_error();
        if api.status_code().is_server_error() {
            tracing::error!(error = %self, status = api.status_code().as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = api.status_code().as_u16(), "request rejected");
        }
        api.into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use termbridge_core::CoreError;

    fn status(err: AppError) -> StatusCode {
        err.to_api_error().status_code()
    }

    #[test]
    fn test_library_errors_map_to_statuses() {
        assert_eq!(
            status(UmlsError::TgtRequestFailed { status: 401 }.into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(UmlsError::from(CoreError::invalid_input("empty")).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(VsacError::NoEntries.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(
                VsacError::HttpStatus {
                    status: 500,
                    body: String::new()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(GitSyncError::Disabled.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = AppError::from(std::io::Error::other("disk path /secret"));
        assert_eq!(err.to_api_error().to_string(), "Internal server error");
    }
}
