//! 同期チェックAPIハンドラー

use super::{error::AppError, rpc_param};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// `/?rpc=<url>` - ノードのブロック進行をチェック
///
/// - synced: 200 + JSON
/// - not_synced: 500 + JSON
/// - RPC失敗: 500 + 空ボディ
pub async fn check_sync(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let endpoint = rpc_param(&params);
    let report = state.prober.check(endpoint).await?;

    let status = if report.status.is_synced() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(report)).into_response())
}
