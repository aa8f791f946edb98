//! HTTP API for the Savings Engine.
//!
//! This module exposes the calculator over a small REST API using the
//! [`axum`](https://crates.io/crates/axum) framework.  Clients send
//! tool picks by id; the server resolves prices from the shared
//! [`ToolCatalog`], validates the profile, runs the calculator and
//! returns the [`CalculationResult`] as JSON.  The last calculation can
//! be stored in and restored from a [`SnapshotStore`].

use crate::catalog::{load_catalog, ToolCatalog, ToolPrice, ToolSelection};
use crate::config::EngineConfig;
use crate::engine::{calculate, compare_scenarios, TARGET_PRICE_PER_SEAT};
use crate::error::EngineError;
use crate::models::{check_fee, CalculationResult, ChallengeSelection, CompanyProfile, Scenario};
use crate::snapshot::{FileSnapshotStore, MemorySnapshotStore, Snapshot, SnapshotStore, SNAPSHOT_KEY};
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Application state shared across requests.
pub struct AppState {
    pub catalog: RwLock<ToolCatalog>,
    pub store: Arc<dyn SnapshotStore>,
}

/// Body of a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub employee_count: u32,
    #[serde(default)]
    pub tools: Vec<ToolSelection>,
    #[serde(default)]
    pub challenges: ChallengeSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareItem {
    pub label: String,
    pub request: CalculateRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareOutcome {
    pub label: String,
    pub result: CalculationResult,
}

/// Error wrapper that renders as `{"error": "..."}`.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self.0, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = Json(serde_json::json!({"error": self.0.to_string()}));
        (status, body).into_response()
    }
}

/// Resolve tool picks against the catalog and validate the profile.
fn resolve_profile(catalog: &ToolCatalog, request: &CalculateRequest) -> Result<CompanyProfile, EngineError> {
    let profile = CompanyProfile {
        employee_count: request.employee_count,
        selected_tools: catalog.resolve_all(&request.tools)?,
    };
    profile.validate()?;
    Ok(profile)
}

/// Build the API router around the given catalog and snapshot store.
pub fn build_router(catalog: ToolCatalog, store: Arc<dyn SnapshotStore>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        catalog: RwLock::new(catalog),
        store,
    });
    let router = Router::new()
        .route("/api/tools", get(list_tools_handler))
        .route("/api/tools/:tool_id", put(put_tool_handler))
        .route("/api/calculate", post(calculate_handler))
        .route("/api/compare", post(compare_handler))
        .route(
            "/api/snapshot",
            get(get_snapshot_handler)
                .put(put_snapshot_handler)
                .delete(delete_snapshot_handler),
        )
        .with_state(state.clone());
    (router, state)
}

/// Handler for GET /api/tools
async fn list_tools_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<ToolPrice>> {
    let catalog = app_state.catalog.read().await;
    Json(catalog.entries().into_iter().cloned().collect())
}

/// Handler for PUT /api/tools/:tool_id
async fn put_tool_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tool_id): Path<String>,
    Json(mut price): Json<ToolPrice>,
) -> Result<Json<ToolPrice>, ApiError> {
    price.tool_id = tool_id;
    // Apply the same bounds as user-supplied subscription fees
    check_fee(&price.tool_id, "monthlyPricePerSeat", price.monthly_price_per_seat)?;
    if let Some(annual) = price.annual_price_per_seat {
        check_fee(&price.tool_id, "annualPricePerSeat", annual)?;
    }
    info!(tool_id = %price.tool_id, "catalog entry updated");
    app_state.catalog.write().await.insert(price.clone());
    Ok(Json(price))
}

/// Handler for POST /api/calculate
async fn calculate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculationResult>, ApiError> {
    // Resolve prices and validate before calculating
    let catalog = app_state.catalog.read().await;
    let profile = resolve_profile(&catalog, &request)?;
    Ok(Json(calculate(&profile, &request.challenges, TARGET_PRICE_PER_SEAT)))
}

/// Handler for POST /api/compare
async fn compare_handler(
    State(app_state): State<Arc<AppState>>,
    Json(items): Json<Vec<CompareItem>>,
) -> Result<Json<Vec<CompareOutcome>>, ApiError> {
    // Resolve every scenario up front; one bad request fails the batch
    let scenarios = {
        let catalog = app_state.catalog.read().await;
        items
            .into_iter()
            .map(|item| {
                Ok::<_, EngineError>(Scenario {
                    profile: resolve_profile(&catalog, &item.request)?,
                    challenges: item.request.challenges,
                    label: item.label,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?
    };
    // Calculate in parallel and pair results back with their labels
    let results = compare_scenarios(&scenarios, TARGET_PRICE_PER_SEAT);
    let outcomes = scenarios
        .into_iter()
        .zip(results)
        .map(|(scenario, result)| CompareOutcome {
            label: scenario.label,
            result,
        })
        .collect();
    Ok(Json(outcomes))
}

/// Handler for GET /api/snapshot
async fn get_snapshot_handler(State(app_state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    match app_state.store.load(SNAPSHOT_KEY)? {
        Some(snapshot) => Ok(Json(snapshot).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// Handler for PUT /api/snapshot.  The stored result is always
/// recomputed from the submitted inputs.
async fn put_snapshot_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    let profile = {
        let catalog = app_state.catalog.read().await;
        resolve_profile(&catalog, &request)?
    };
    // Recompute rather than trust a client-supplied result
    let result = calculate(&profile, &request.challenges, TARGET_PRICE_PER_SEAT);
    let snapshot = Snapshot {
        profile,
        challenges: request.challenges,
        result: Some(result),
    };
    app_state.store.save(SNAPSHOT_KEY, &snapshot)?;
    Ok(Json(snapshot))
}

/// Handler for DELETE /api/snapshot
async fn delete_snapshot_handler(State(app_state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    app_state.store.clear(SNAPSHOT_KEY)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Launch the API server.  Loads the catalog, picks a snapshot store
/// according to `config` and serves until the process is stopped.
pub async fn serve(config: EngineConfig) -> Result<()> {
    let catalog = load_catalog(&config.catalog_dir)?;
    // Persist snapshots to disk only when a directory is configured
    let store: Arc<dyn SnapshotStore> = match &config.snapshot_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "using file snapshot store");
            Arc::new(FileSnapshotStore::new(dir.clone()))
        }
        None => Arc::new(MemorySnapshotStore::new()),
    };
    let (router, _state) = build_router(catalog, store);
    // Bind and serve until the process is stopped
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
