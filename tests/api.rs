use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use savings_engine::api::build_router;
use savings_engine::catalog::ToolCatalog;
use savings_engine::snapshot::{MemorySnapshotStore, SnapshotStore, SNAPSHOT_KEY};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> (Router, Arc<MemorySnapshotStore>) {
    let store = Arc::new(MemorySnapshotStore::new());
    let (router, _state) = build_router(ToolCatalog::builtin(), store.clone());
    (router, store)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_calculate_from_catalog_prices() {
    let (router, _) = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/calculate",
        Some(json!({
            "employeeCount": 100,
            "tools": [{"toolId": "slack"}, {"toolId": "zoom"}, {"toolId": "google-workspace"}],
            "challenges": {"selected": ["tool-cost"]}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentMonthlyCost"], json!(421000.0));
    assert_eq!(body["targetMonthlyCost"], json!(142000.0));
    assert_eq!(body["monthlySavings"], json!(279000.0));
    assert_eq!(body["annualSavings"], json!(3348000.0));
    assert_eq!(body["useCases"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_calculate_with_annual_override() {
    let (router, _) = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/calculate",
        Some(json!({
            "employeeCount": 10,
            "tools": [{"toolId": "box", "isAnnualBilling": true, "annualFeeOverride": 10800.0}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentMonthlyCost"], json!(9000.0));
    assert_eq!(body["currentAnnualCost"], json!(108000.0));
}

#[tokio::test]
async fn test_calculate_rejects_bad_input() {
    let (router, _) = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/calculate",
        Some(json!({"employeeCount": 10, "tools": [{"toolId": "no-such-tool"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no-such-tool"));

    let (status, _) = send(&router, "POST", "/api/calculate", Some(json!({"employeeCount": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/api/calculate",
        Some(json!({"employeeCount": 5, "tools": [{"toolId": "slack"}, {"toolId": "slack"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calculate_rejects_overflowing_fee() {
    let (router, _) = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/calculate",
        Some(json!({
            "employeeCount": 1000,
            "tools": [{"toolId": "zoom", "monthlyFeeOverride": 1e306}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("monthlyFeePerSeat"));

    let (status, _) = send(
        &router,
        "PUT",
        "/api/tools/huge",
        Some(json!({"toolId": "huge", "displayName": "Huge", "monthlyPricePerSeat": 1e306})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_compare_keeps_order() {
    let (router, _) = app();
    let items: Vec<Value> = [10, 50, 200]
        .iter()
        .map(|seats| {
            json!({
                "label": format!("{seats} seats"),
                "request": {"employeeCount": seats, "tools": [{"toolId": "zoom"}]}
            })
        })
        .collect();
    let (status, body) = send(&router, "POST", "/api/compare", Some(Value::Array(items))).await;
    assert_eq!(status, StatusCode::OK);
    let outcomes = body.as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["label"], "10 seats");
    assert_eq!(outcomes[2]["label"], "200 seats");
    assert_eq!(outcomes[1]["result"]["currentMonthlyCost"], json!(100000.0));
}

#[tokio::test]
async fn test_custom_tool_becomes_resolvable() {
    let (router, _) = app();
    let (status, _) = send(
        &router,
        "PUT",
        "/api/tools/lark",
        Some(json!({"toolId": "ignored", "displayName": "Lark", "monthlyPricePerSeat": 1200.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, tools) = send(&router, "GET", "/api/tools", None).await;
    assert!(tools
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["toolId"] == "lark" && t["displayName"] == "Lark"));

    let (status, body) = send(
        &router,
        "POST",
        "/api/calculate",
        Some(json!({"employeeCount": 2, "tools": [{"toolId": "lark"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentMonthlyCost"], json!(2400.0));

    let (status, _) = send(
        &router,
        "PUT",
        "/api/tools/bad",
        Some(json!({"toolId": "bad", "displayName": "Bad", "monthlyPricePerSeat": -5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_snapshot_lifecycle() {
    let (router, store) = app();
    let (status, _) = send(&router, "GET", "/api/snapshot", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, saved) = send(
        &router,
        "PUT",
        "/api/snapshot",
        Some(json!({
            "employeeCount": 50,
            "tools": [],
            "challenges": {"selected": ["other"], "otherLabel": "Paper approvals"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["result"]["monthlySavings"], json!(-71000.0));
    assert_eq!(saved["result"]["savingsPercentage"], json!(0.0));
    assert!(store.load(SNAPSHOT_KEY).unwrap().is_some());

    let (status, loaded) = send(&router, "GET", "/api/snapshot", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded, saved);

    let (status, _) = send(&router, "DELETE", "/api/snapshot", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.load(SNAPSHOT_KEY).unwrap().is_none());
}
