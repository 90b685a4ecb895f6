//! Contract Test: `/check_balance?rpc=<url>&address=<addr>&alert=<wei>`

use crate::support::{
    app::{body_bytes, build_app, get_request, TEST_INTERVAL},
    node::balance_response,
};
use axum::http::{header, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "0x407d73d8a49eeb85d32cf465507dd71d507100c1";

/// `eth_getBalance` の `[ADDRESS, "latest"]` に応答するノード
async fn start_balance_node(response: ResponseTemplate) -> MockServer {
    let node = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "eth_getBalance",
            "params": [ADDRESS, "latest"]
        })))
        .respond_with(response)
        .expect(1)
        .mount(&node)
        .await;
    node
}

fn balance_uri(node: &MockServer, query: &str) -> String {
    format!(
        "/check_balance?rpc={}&address={}{}",
        node.uri(),
        ADDRESS,
        query
    )
}

/// 残高 == alert: 200 balance_low
#[tokio::test]
async fn test_balance_equal_to_alert_is_low() {
    // 1 ETH
    let node = start_balance_node(balance_response("0xde0b6b3a7640000")).await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&balance_uri(&node, "&alert=1000000000000000000")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body,
        json!({
            "address": ADDRESS,
            "balance": "0xde0b6b3a7640000",
            "balance_decimal": 1_000_000_000_000_000_000u64,
            "alert_threshold": 1_000_000_000_000_000_000u64,
            "status": "balance_low"
        })
    );
}

/// 残高 > alert: 500 balance_sufficient
#[tokio::test]
async fn test_balance_above_alert_is_sufficient() {
    let node = start_balance_node(balance_response("0xde0b6b3a7640000")).await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&balance_uri(&node, "&alert=999999999999999999")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "balance_sufficient");
    assert_eq!(body["alert_threshold"], 999_999_999_999_999_999u64);
}

/// alert 省略時は 0。残高 0 は balance_low
#[tokio::test]
async fn test_zero_balance_without_alert_is_low() {
    let node = start_balance_node(balance_response("0x0")).await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&balance_uri(&node, "")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["alert_threshold"], 0);
    assert_eq!(body["balance"], "0x0");
    assert_eq!(body["status"], "balance_low");
}

/// 残高取得失敗: 500 + status "error" のボディ
#[tokio::test]
async fn test_lookup_failure_returns_error_report() {
    let node = start_balance_node(ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {"code": -32602, "message": "invalid address"}
    })))
    .await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&balance_uri(&node, "&alert=42")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body,
        json!({
            "address": ADDRESS,
            "balance": "0x0",
            "balance_decimal": 0,
            "alert_threshold": 42,
            "status": "error"
        })
    );
}
