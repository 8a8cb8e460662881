//! HTTP API over the scraper
//!
//! Stateless facade: credentials travel in each request body, one
//! scraper session is created per request and discarded afterwards.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::error;

use zamunda_core::{ClientConfig, SearchOptions, SearchResult, ZamundaError, ZamundaScraper};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared server state: the client configuration every per-request
/// scraper is built from
pub struct AppState {
    pub client_config: ClientConfig,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/search", post(search))
        .route("/search/batch", post(search_batch))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    username: String,
    password: String,
    #[serde(default)]
    resolve_magnets: bool,
}

#[derive(Deserialize)]
struct BatchSearchRequest {
    queries: Vec<String>,
    username: String,
    password: String,
    #[serde(default)]
    resolve_magnets: bool,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let scraper = ZamundaScraper::with_config(state.client_config.clone())?;
    let options = SearchOptions {
        resolve_magnets: request.resolve_magnets,
    };

    let results = scraper
        .search(&request.query, &request.username, &request.password, &options)
        .await?;
    Ok(Json(results))
}

async fn search_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchSearchRequest>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let scraper = ZamundaScraper::with_config(state.client_config.clone())?;
    let options = SearchOptions {
        resolve_magnets: request.resolve_magnets,
    };

    let queries: Vec<&str> = request.queries.iter().map(String::as_str).collect();
    let results = scraper
        .search_multi(&queries, &request.username, &request.password, &options)
        .await?;
    Ok(Json(results))
}

/// Scraper error carried to an HTTP response
struct ApiError(ZamundaError);

impl From<ZamundaError> for ApiError {
    fn from(error: ZamundaError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ZamundaError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ZamundaError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ZamundaError::ConnectionFailed(_)
            | ZamundaError::Http(_)
            | ZamundaError::UnexpectedStatus(_)
            | ZamundaError::LoginFailed(_) => StatusCode::BAD_GATEWAY,
            ZamundaError::Parse(_) | ZamundaError::TorrentDecode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        (status, Json(serde_json::json!({ "error": self.0 }))).into_response()
    }
}
