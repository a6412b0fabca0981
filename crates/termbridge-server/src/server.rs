use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use termbridge_export::ExportFormat;
use termbridge_umls::UmlsClient;
use termbridge_vsac::VsacClient;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::AppConfig, git_sync, git_sync::GitSync, handlers, session::SessionStore, snomed,
    value_sets,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub umls: UmlsClient,
    pub vsac: VsacClient,
    pub sessions: SessionStore,
    pub export_format: ExportFormat,
    /// `None` when git sync is disabled
    pub git_sync: Option<Arc<GitSync>>,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let umls = UmlsClient::new(cfg.umls.clone())?;
        let vsac = VsacClient::new(&cfg.vsac, cfg.umls.api_key.clone())?;
        Ok(Self {
            umls,
            vsac,
            sessions: SessionStore::new(cfg.export.output_dir.clone())
                .with_ttl(cfg.export.session_ttl())
                .with_max_sessions(cfg.export.max_sessions),
            export_format: cfg.export.format,
            git_sync: GitSync::from_config(&cfg.git_sync).map(Arc::new),
        })
    }
}

pub struct TermbridgeServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = AppState::from_config(cfg)?;
    Ok(router(state, cfg.server.body_limit_bytes))
}

pub fn router(state: AppState, body_limit: usize) -> Router {
    let snomed_routes = Router::new()
        .route("/snomed/search", post(snomed::search))
        .route("/snomed/map", post(snomed::map))
        .route("/snomed/export", post(snomed::export));

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // VSAC value sets
        .route("/search", post(value_sets::search))
        .route("/view/{value_set_id}", get(value_sets::view))
        .route("/retrieve", post(value_sets::retrieve))
        .route("/retrieve/download", get(handlers::download))
        .nest("/app2", snomed_routes)
        .route("/sync-git", post(git_sync::sync_git))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri().path(),
                        http.status_code = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> anyhow::Result<TermbridgeServer> {
        let app = build_app(&self.config)?;
        Ok(TermbridgeServer {
            addr: self.addr,
            app,
        })
    }
}

impl TermbridgeServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn error_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app(body_limit: usize) -> Router {
        let mut cfg = AppConfig::default();
        cfg.umls.api_key = "test-key".into();
        router(AppState::from_config(&cfg).unwrap(), body_limit)
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = app(1024)
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_limit_is_enforced() {
        let body = format!(r#"{{"selected_ids":["{}"]}}"#, "1".repeat(4096));
        let response = app(1024)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/retrieve")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_gets_json_error() {
        let response = app(1024)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/app2/snomed/map")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"selected_ids\": ["))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_content_type_gets_json_error() {
        let response = app(1024)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/search")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"term\":\"asthma\"}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(error_body(response).await["error"].is_string());

        let response = app(1024)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/retrieve")
                    .body(Body::from("selected_ids=1"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app(1024)
            .oneshot(Request::builder().uri("/fhir/Patient").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
