use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{InventoryItemId, InventorySummary, LineItemCandidate};
use super::repository::{InventoryRepository, RepositoryError};
use super::service::{InventoryScoringService, InventoryServiceError};
use crate::workflows::advisory::AdvisoryReport;
use crate::workflows::risk::{final_risk, quantity_risk, signal_risk, QuantityUnit, RiskScores};
use crate::workflows::signals::SignalSource;

/// Router builder exposing inventory intake and the exported scoring functions.
pub fn inventory_router<S, R>(service: Arc<InventoryScoringService<S, R>>) -> Router
where
    S: SignalSource + 'static,
    R: InventoryRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/inventory",
            get(list_handler::<S, R>).delete(reset_handler::<S, R>),
        )
        .route("/api/v1/inventory/items", post(submit_handler::<S, R>))
        .route("/api/v1/inventory/import", post(import_handler::<S, R>))
        .route(
            "/api/v1/inventory/:item_id/advice",
            get(advice_handler::<S, R>),
        )
        .route("/api/v1/risk/signal", get(signal_handler::<S, R>))
        .route("/api/v1/risk/quantity", get(quantity_handler))
        .route("/api/v1/risk/final", post(final_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    csv: String,
    #[serde(default)]
    default_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignalParams {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuantityParams {
    quantity: f64,
    #[serde(default)]
    unit: Option<String>,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn service_error_response(error: InventoryServiceError) -> Response {
    let status = match &error {
        InventoryServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InventoryServiceError::Scoring(_) => StatusCode::BAD_GATEWAY,
        InventoryServiceError::BatchFormat(_) => StatusCode::BAD_REQUEST,
        InventoryServiceError::Repository(RepositoryError::Stale(_)) => StatusCode::CONFLICT,
        InventoryServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        InventoryServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error)
}

pub(crate) async fn submit_handler<S, R>(
    State(service): State<Arc<InventoryScoringService<S, R>>>,
    axum::Json(candidate): axum::Json<LineItemCandidate>,
) -> Response
where
    S: SignalSource + 'static,
    R: InventoryRepository + 'static,
{
    match service.submit(candidate).await {
        Ok(item) => (StatusCode::CREATED, axum::Json(item)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn import_handler<S, R>(
    State(service): State<Arc<InventoryScoringService<S, R>>>,
    axum::Json(request): axum::Json<ImportRequest>,
) -> Response
where
    S: SignalSource + 'static,
    R: InventoryRepository + 'static,
{
    let default_unit = request
        .default_unit
        .as_deref()
        .map(QuantityUnit::parse)
        .unwrap_or_default();

    match service
        .import(Cursor::new(request.csv.into_bytes()), &default_unit)
        .await
    {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_handler<S, R>(
    State(service): State<Arc<InventoryScoringService<S, R>>>,
) -> Response
where
    S: SignalSource + 'static,
    R: InventoryRepository + 'static,
{
    match service.list() {
        Ok(items) => {
            let summary = InventorySummary::from_items(&items);
            let payload = json!({
                "items": items,
                "summary": summary,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn reset_handler<S, R>(
    State(service): State<Arc<InventoryScoringService<S, R>>>,
) -> Response
where
    S: SignalSource + 'static,
    R: InventoryRepository + 'static,
{
    match service.reset() {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn advice_handler<S, R>(
    State(service): State<Arc<InventoryScoringService<S, R>>>,
    Path(item_id): Path<String>,
) -> Response
where
    S: SignalSource + 'static,
    R: InventoryRepository + 'static,
{
    let id = InventoryItemId(item_id);
    match service.get(&id) {
        Ok(item) => {
            let report = AdvisoryReport::for_item(&item);
            (StatusCode::OK, axum::Json(report)).into_response()
        }
        Err(InventoryServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "inventory item not found",
                "item_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn signal_handler<S, R>(
    State(service): State<Arc<InventoryScoringService<S, R>>>,
    Query(params): Query<SignalParams>,
) -> Response
where
    S: SignalSource + 'static,
    R: InventoryRepository + 'static,
{
    let query = params.query.trim();
    if query.is_empty() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "query is required");
    }

    let result = signal_risk(service.source().as_ref(), query).await;
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn quantity_handler(Query(params): Query<QuantityParams>) -> Response {
    let unit = params
        .unit
        .as_deref()
        .map(QuantityUnit::parse)
        .unwrap_or_default();
    let result = quantity_risk(params.quantity, &unit);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn final_handler(axum::Json(scores): axum::Json<RiskScores>) -> Response {
    if let Some((signal, score)) = scores.out_of_range() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{signal} score {score} is outside 0..=100"),
        );
    }

    (StatusCode::OK, axum::Json(final_risk(scores))).into_response()
}
