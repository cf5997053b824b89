//! JSON HTTP API for the web UI.
//!
//! # Endpoints
//!
//! | Method   | Path             | Description |
//! |----------|------------------|-------------|
//! | `GET`    | `/health`        | Health check (returns version) |
//! | `POST`   | `/search`        | Ranked search over the catalog |
//! | `GET`    | `/evidence`      | List documents (optional `?category=`) |
//! | `POST`   | `/evidence`      | Register a document's metadata |
//! | `GET`    | `/evidence/{id}` | Fetch one document |
//! | `DELETE` | `/evidence/{id}` | Remove one document |
//!
//! # Error Contract
//!
//! Error responses use a JSON envelope:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "filename must not be empty" } }
//! ```
//!
//! Codes: `bad_request` (400), `not_found` (404), `internal` (500).
//! A vault outage is NOT an error here — search falls back to local
//! ranking and still returns 200 with results.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted; the browser UI is
//! served from a different origin in development.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use docket_core::models::{EvidenceDoc, ScoredMatch, SearchFilters};
use docket_core::store::MetadataStore;

use crate::catalog::{add_evidence, list_evidence, NewEvidence};
use crate::config::Config;
use crate::db;
use crate::search::search_evidence;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Start the HTTP server on the configured bind address.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/search", post(handle_search))
        .route("/evidence", get(handle_list).post(handle_create))
        .route("/evidence/{id}", get(handle_get).delete(handle_delete))
        .layer(cors)
        .with_state(state);

    println!("Docket API listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error envelope body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Map a handler error onto the most specific HTTP status.
///
/// Validation-shaped messages become 400, missing records 404, the rest 500.
fn classify_error(err: anyhow::Error) -> AppError {
    let msg = err.to_string();
    if msg.contains("not found") {
        not_found(msg)
    } else if msg.contains("must not be empty")
        || msg.contains("Unknown search mode")
        || msg.contains("Unknown vault method")
        || msg.contains("requires")
    {
        bad_request(msg)
    } else {
        internal(msg)
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

// ============ POST /search ============

/// Request body for `POST /search`.
#[derive(Deserialize)]
struct SearchBody {
    query: String,
    /// `auto` (default), `keyword`, `local`, or `vault`.
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    /// Pre-computed query embedding for `local` mode; the UI obtains it
    /// from the vault's embedding endpoint.
    #[serde(default)]
    query_embedding: Option<Vec<f32>>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<ScoredMatch>,
}

async fn handle_search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResponse>, AppError> {
    let filters = SearchFilters {
        categories: body.categories,
        tags: body.tags,
    };
    let results = search_evidence(
        &state.config,
        &body.query,
        body.mode.as_deref().unwrap_or("auto"),
        &filters,
        body.query_embedding.as_deref(),
        body.limit,
    )
    .await
    .map_err(classify_error)?;

    Ok(Json(SearchResponse { results }))
}

// ============ /evidence ============

#[derive(Serialize)]
struct ListResponse {
    documents: Vec<EvidenceDoc>,
}

async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, AppError> {
    let pool = db::connect(&state.config).await.map_err(classify_error)?;
    let store = SqliteStore::new(pool.clone());

    let documents = list_evidence(&store, params.get("category").map(String::as_str))
        .await
        .map_err(classify_error)?;
    pool.close().await;

    Ok(Json(ListResponse { documents }))
}

async fn handle_create(
    State(state): State<AppState>,
    Json(new): Json<NewEvidence>,
) -> Result<(StatusCode, Json<EvidenceDoc>), AppError> {
    let pool = db::connect(&state.config).await.map_err(classify_error)?;
    let store = SqliteStore::new(pool.clone());

    let doc = add_evidence(&store, new).await.map_err(classify_error)?;
    pool.close().await;

    Ok((StatusCode::CREATED, Json(doc)))
}

async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EvidenceDoc>, AppError> {
    let doc = crate::get::get_evidence(&state.config, &id)
        .await
        .map_err(classify_error)?;
    Ok(Json(doc))
}

async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let pool = db::connect(&state.config).await.map_err(classify_error)?;
    let store = SqliteStore::new(pool.clone());

    let existed = store.delete(&id).await.map_err(classify_error)?;
    pool.close().await;

    if existed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(format!("evidence not found: {}", id)))
    }
}
