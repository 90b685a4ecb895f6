//! Contract Test: `/finalized_latest_diff?rpc=<url>&diff=<n>`

use crate::support::{
    app::{body_bytes, build_app, get_request, TEST_INTERVAL},
    node::{block_response, mount_block_by_tag},
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// finalized = 0x100, latest = 0x140（差分 64）のノード
async fn start_finality_node() -> MockServer {
    let node = MockServer::start().await;
    mount_block_by_tag(&node, "finalized", block_response("0x100")).await;
    mount_block_by_tag(&node, "latest", block_response("0x140")).await;
    node
}

fn diff_uri(node: &MockServer, query: &str) -> String {
    format!("/finalized_latest_diff?rpc={}{}", node.uri(), query)
}

/// 差分が閾値未満: 200
#[tokio::test]
async fn test_gap_below_threshold_is_ok() {
    let node = start_finality_node().await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&diff_uri(&node, "&diff=100")))
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
            "finalized_block": 256,
            "latest_block": 320,
            "difference": 64,
            "finalized_hex": "0x100",
            "latest_hex": "0x140"
        })
    );
}

/// 差分が閾値と等しい: 503
#[tokio::test]
async fn test_gap_equal_to_threshold_is_unavailable() {
    let node = start_finality_node().await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&diff_uri(&node, "&diff=64")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["difference"], 64);
}

/// diff 省略・解釈不能は 0 扱い
#[tokio::test]
async fn test_missing_or_invalid_threshold_defaults_to_zero() {
    let node = start_finality_node().await;

    for query in ["", "&diff=lots"] {
        let response = build_app(TEST_INTERVAL)
            .oneshot(get_request(&diff_uri(&node, query)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "query {:?}", query);
    }
}

/// finalized 取得失敗: 500 + すべて空のボディ、latest は問い合わせない
#[tokio::test]
async fn test_finalized_failure_returns_empty_report() {
    let node = MockServer::start().await;
    mount_block_by_tag(&node, "finalized", ResponseTemplate::new(502)).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"params": ["latest", false]})))
        .respond_with(block_response("0x140"))
        .expect(0)
        .mount(&node)
        .await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&diff_uri(&node, "&diff=10")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body,
        json!({
            "finalized_block": 0,
            "latest_block": 0,
            "difference": 0,
            "finalized_hex": "",
            "latest_hex": ""
        })
    );
}

/// latest 取得失敗: 500 + finalized のみ埋めたボディ
#[tokio::test]
async fn test_latest_failure_keeps_finalized_height() {
    let node = MockServer::start().await;
    mount_block_by_tag(&node, "finalized", block_response("0x100")).await;
    mount_block_by_tag(
        &node,
        "latest",
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": null
        })),
    )
    .await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&diff_uri(&node, "&diff=10")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body,
        json!({
            "finalized_block": 256,
            "latest_block": 0,
            "difference": 0,
            "finalized_hex": "0x100",
            "latest_hex": ""
        })
    );
}

/// 差分チェックはブロック進行判定（2回サンプリング）を経由しない
#[tokio::test]
async fn test_route_does_not_run_sync_check() {
    let node = start_finality_node().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_blockNumber"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&node)
        .await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(get_request(&diff_uri(&node, "&diff=100")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// GET 以外は 405
#[tokio::test]
async fn test_non_get_is_rejected() {
    let node = MockServer::start().await;
    let app = build_app(TEST_INTERVAL);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(diff_uri(&node, "&diff=10"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(node.received_requests().await.unwrap().is_empty());
}
