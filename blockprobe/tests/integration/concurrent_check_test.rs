//! サンプル間の待機が他のリクエストを止めないことを確認する

use crate::support::{
    app::{build_app, check_request},
    node::start_node,
};
use axum::http::StatusCode;
use std::time::{Duration, Instant};
use tower::ServiceExt;

const INTERVAL: Duration = Duration::from_millis(500);

#[tokio::test]
async fn test_waits_run_concurrently() {
    let advancing = start_node(&["0x1", "0x2"]).await;
    let stalled = start_node(&["0x7"]).await;
    let app = build_app(INTERVAL);

    let started = Instant::now();
    let (first, second) = tokio::join!(
        app.clone().oneshot(check_request(&advancing.uri())),
        app.clone().oneshot(check_request(&stalled.uri())),
    );
    let elapsed = started.elapsed();

    assert_eq!(first.unwrap().status(), StatusCode::OK);
    assert_eq!(second.unwrap().status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(elapsed >= INTERVAL);
    assert!(
        elapsed < INTERVAL * 2,
        "two checks took {:?}, expected them to overlap",
        elapsed
    );
}
