//! finalized / latest 差分チェックAPIハンドラー

use super::{query_param, rpc_param};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blockprobe_common::types::{BlockDiffReport, BlockTag};
use tracing::{info, warn};

/// 差分の閾値を指定するクエリパラメータ名
pub const DIFF_QUERY_PARAM: &str = "diff";

/// `/finalized_latest_diff?rpc=<url>&diff=<n>` - ファイナリティの遅れをチェック
///
/// - 差分 < diff: 200 + JSON
/// - 差分 >= diff: 503 + JSON
/// - RPC失敗: 500 + 取得できた分だけ埋めたJSON
pub async fn check_finality_gap(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let endpoint = rpc_param(&params);
    let max_difference = diff_param(&params);

    let finalized = match state.rpc.fetch_block_by_tag(endpoint, BlockTag::Finalized).await {
        Ok(height) => height,
        Err(e) => {
            warn!(kind = e.kind(), error = %e, tag = %BlockTag::Finalized, "Block lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BlockDiffReport::unavailable()),
            )
                .into_response();
        }
    };

    let latest = match state.rpc.fetch_block_by_tag(endpoint, BlockTag::Latest).await {
        Ok(height) => height,
        Err(e) => {
            warn!(kind = e.kind(), error = %e, tag = %BlockTag::Latest, "Block lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BlockDiffReport::finalized_only(finalized)),
            )
                .into_response();
        }
    };

    let report = BlockDiffReport::new(finalized, latest);
    let within = report.is_within(max_difference);

    info!(
        finalized = report.finalized_block,
        latest = report.latest_block,
        difference = %report.difference,
        max_difference,
        within,
        "Finality gap check completed"
    );

    let status = if within {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report)).into_response()
}

/// `diff` パラメータ（無い・解釈できない場合は 0）
fn diff_param(params: &[(String, String)]) -> i64 {
    query_param(params, DIFF_QUERY_PARAM)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
