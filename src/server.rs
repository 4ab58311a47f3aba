//! HTTP API server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/generate-readme` | Generate a README with the configured model |
//! | `POST` | `/generate-vitepress` | Scaffold a VitePress site from the repository README |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Both generation endpoints take `{ "repo_url": "<git url>" }`.
//!
//! # Error Contract
//!
//! Pipeline failures are returned as HTTP 500 with the error chain:
//!
//! ```json
//! { "detail": "git clone failed: fatal: repository '...' not found" }
//! ```
//!
//! # CORS
//!
//! Only the configured `[server].cors_origin` may call the API from a
//! browser. Credentials are allowed; methods and headers mirror the request.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::models::{ReadmeResponse, RepoRequest, SiteReport};
use crate::pipeline::Pipeline;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
}

/// Starts the HTTP server on `[server].bind` and runs until the process exits.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pipeline = Arc::new(Pipeline::from_config(Arc::new(config.clone()))?);
    let app = build_router(pipeline)?;

    tracing::info!(
        "repodoc listening on http://{} (model {}, ollama {})",
        bind_addr,
        config.ollama.model,
        config.ollama.url
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the router with all routes and the CORS layer.
///
/// Exposed separately from [`run_server`] so callers can serve it on their
/// own listener.
pub fn build_router(pipeline: Arc<Pipeline>) -> anyhow::Result<Router> {
    let origin: HeaderValue = pipeline
        .config()
        .server
        .cors_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.cors_origin: {}", e))?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let state = AppState { pipeline };

    Ok(Router::new()
        .route("/generate-readme", post(handle_generate_readme))
        .route("/generate-vitepress", post(handle_generate_vitepress))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state))
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("{:#}", err),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /generate-readme ============

/// Returns the model's README text verbatim. Nothing is written to disk.
async fn handle_generate_readme(
    State(state): State<AppState>,
    Json(req): Json<RepoRequest>,
) -> Result<Json<ReadmeResponse>, AppError> {
    let invocation = state
        .pipeline
        .generate_readme(&req.repo_url)
        .await
        .inspect_err(|e| tracing::error!(repo_url = %req.repo_url, error = %e, "README generation failed"))?;

    Ok(Json(ReadmeResponse {
        readme: invocation.response,
    }))
}

// ============ POST /generate-vitepress ============

async fn handle_generate_vitepress(
    State(state): State<AppState>,
    Json(req): Json<RepoRequest>,
) -> Result<Json<SiteReport>, AppError> {
    let report = state
        .pipeline
        .generate_site(&req.repo_url)
        .await
        .inspect_err(|e| tracing::error!(repo_url = %req.repo_url, error = %e, "site generation failed"))?;

    Ok(Json(report))
}
