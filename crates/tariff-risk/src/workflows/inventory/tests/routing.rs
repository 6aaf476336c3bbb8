use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::inventory::router::{import_handler, submit_handler, ImportRequest};
use crate::workflows::inventory::{inventory_router, InventoryScoringService, RetrievalPolicy};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("encode")))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn submit_route_returns_created_item() {
    let (service, _, _) = build_service(FixedSource::uniform(flagged(4)));
    let router = inventory_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/inventory/items",
            json!({
                "item_name": "Steel",
                "category": "Manufacturing",
                "origin_country": "China",
                "quantity": 500,
                "unit": "ton"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["risk_breakdown"]["final_level"], json!("HIGH"));
    assert_eq!(payload["unit"], json!("ton"));
    assert!(payload["id"].as_str().unwrap_or_default().starts_with("item-"));
}

#[tokio::test]
async fn submit_handler_returns_unprocessable_for_validation_error() {
    let (service, _, _) = build_service(FixedSource::uniform(flagged(1)));
    let mut candidate = steel_candidate();
    candidate.origin_country = "  ".to_string();

    let response = submit_handler::<FixedSource, MemoryRepository>(
        State(Arc::new(service)),
        axum::Json(candidate),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("origin country is required"));
}

#[tokio::test]
async fn submit_handler_returns_bad_gateway_when_retrieval_aborts() {
    let service = InventoryScoringService::new(
        Arc::new(FailingSource::always()),
        Arc::new(MemoryRepository::default()),
        RetrievalPolicy::Abort,
    );

    let response = submit_handler(State(Arc::new(service)), axum::Json(steel_candidate())).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_stale_epoch() {
    let repository = Arc::new(MemoryRepository::default());
    let service = InventoryScoringService::new(
        Arc::new(ResettingSource {
            repository: repository.clone(),
        }),
        repository,
        RetrievalPolicy::Substitute,
    );

    let response = submit_handler(State(Arc::new(service)), axum::Json(steel_candidate())).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = InventoryScoringService::new(
        Arc::new(FixedSource::uniform(flagged(1))),
        Arc::new(UnavailableRepository),
        RetrievalPolicy::Substitute,
    );

    let response = submit_handler(State(Arc::new(service)), axum::Json(steel_candidate())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn import_then_list_then_reset() {
    let (service, _, _) = build_service(FixedSource::uniform(flagged(2)));
    let router = inventory_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/inventory/import",
            json!({
                "csv": "Item Name,Industry,Origin Country,Quantity\nWheat,Agriculture,Canada,20\nCorn,Agriculture,,5\n",
                "default_unit": "ton"
            }),
        ))
        .await
        .expect("import executes");
    assert_eq!(response.status(), StatusCode::OK);
    let summary = read_json_body(response).await;
    assert_eq!(summary["imported"], json!(1));
    assert_eq!(summary["skipped"], json!(1));
    assert_eq!(summary["items"][0]["unit"], json!("ton"));

    let response = router
        .clone()
        .oneshot(get_request("/api/v1/inventory"))
        .await
        .expect("list executes");
    assert_eq!(response.status(), StatusCode::OK);
    let listing = read_json_body(response).await;
    assert_eq!(listing["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(listing["summary"]["total"], json!(1));
    assert_eq!(listing["summary"]["medium"], json!(1));

    let response = router
        .clone()
        .oneshot(
            Request::delete("/api/v1/inventory")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("reset executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(get_request("/api/v1/inventory"))
        .await
        .expect("list executes");
    let listing = read_json_body(response).await;
    assert_eq!(listing["summary"]["total"], json!(0));
}

fn router_service(
    source: FixedSource,
) -> Arc<InventoryScoringService<FixedSource, MemoryRepository>> {
    let (service, _, _) = build_service(source);
    Arc::new(service)
}

#[tokio::test]
async fn import_handler_rejects_missing_columns() {
    let request: ImportRequest =
        serde_json::from_value(json!({ "csv": "Item Name\nSteel\n" })).expect("request");

    let response = import_handler(
        State(router_service(FixedSource::uniform(flagged(1)))),
        axum::Json(request),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        json!("missing required columns: industry, origin country, quantity")
    );
}

#[tokio::test]
async fn import_route_rejects_header_only_files() {
    let router = inventory_router(router_service(FixedSource::uniform(flagged(1))));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/inventory/import",
            json!({ "csv": "Item Name,Industry,Origin Country,Quantity\n" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("file has no data rows"));
}

#[tokio::test]
async fn advice_route_reports_known_items_and_404_for_unknown() {
    let service = router_service(FixedSource::uniform(flagged(4)));
    let item = service.submit(steel_candidate()).await.expect("submit");
    let router = inventory_router(service);

    let response = router
        .clone()
        .oneshot(get_request(&format!("/api/v1/inventory/{}/advice", item.id)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let report = read_json_body(response).await;
    assert_eq!(report["alternatives"].as_array().map(Vec::len), Some(3));
    assert!(report["advice"]
        .as_str()
        .unwrap_or_default()
        .contains("diversifying"));

    let response = router
        .oneshot(get_request("/api/v1/inventory/item-unknown/advice"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signal_route_recovers_failures_and_requires_query() {
    let service = InventoryScoringService::new(
        Arc::new(FailingSource::always()),
        Arc::new(MemoryRepository::default()),
        RetrievalPolicy::Abort,
    );
    let router = inventory_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(get_request("/api/v1/risk/signal?query=US%20China%20tariffs"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], json!(0));
    assert_eq!(payload["availability"], json!("unavailable"));

    let response = router
        .oneshot(get_request("/api/v1/risk/signal?query=%20"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn quantity_route_applies_unit_multiplier() {
    let router = inventory_router(router_service(FixedSource::uniform(flagged(0))));

    let response = router
        .oneshot(get_request("/api/v1/risk/quantity?quantity=2&unit=ton"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], json!(50));
}

#[tokio::test]
async fn final_route_aggregates_and_rejects_out_of_range_scores() {
    let router = inventory_router(router_service(FixedSource::uniform(flagged(0))));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/risk/final",
            json!({ "country": 80, "item": 90, "industry": 60, "quantity": 20 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    // 24 + 36 + 12 + 2
    assert_eq!(payload["final_score"], json!(74));
    assert_eq!(payload["final_level"], json!("HIGH"));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/risk/final",
            json!({ "country": 101, "item": 0, "industry": 0, "quantity": 0 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
