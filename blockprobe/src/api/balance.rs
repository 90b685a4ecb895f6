//! 残高チェックAPIハンドラー

use super::{query_param, rpc_param};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blockprobe_common::types::{BalanceReport, BalanceStatus};
use tracing::{info, warn};

/// 対象アドレスのクエリパラメータ名
pub const ADDRESS_QUERY_PARAM: &str = "address";
/// アラート閾値（wei）のクエリパラメータ名
pub const ALERT_QUERY_PARAM: &str = "alert";

/// `/check_balance?rpc=<url>&address=<addr>&alert=<wei>` - 残高をチェック
///
/// HTTPステータスは判定と逆向き（残高が十分なとき500）。
/// - balance_sufficient（残高 > alert）: 500 + JSON
/// - balance_low（残高 <= alert）: 200 + JSON
/// - RPC失敗: 500 + `status: "error"` のJSON
pub async fn check_balance(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let endpoint = rpc_param(&params);
    let address = query_param(&params, ADDRESS_QUERY_PARAM).unwrap_or("");
    let alert_threshold = alert_param(&params);

    let report = match state.rpc.fetch_balance(endpoint, address).await {
        Ok(balance) => BalanceReport::new(address.to_string(), balance, alert_threshold),
        Err(e) => {
            warn!(kind = e.kind(), error = %e, address, "Balance lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BalanceReport::unavailable(address.to_string(), alert_threshold)),
            )
                .into_response();
        }
    };

    info!(
        address,
        balance = %report.balance_decimal,
        alert_threshold = %alert_threshold,
        status = ?report.status,
        "Balance check completed"
    );

    let status = match report.status {
        BalanceStatus::BalanceLow => StatusCode::OK,
        BalanceStatus::BalanceSufficient | BalanceStatus::Error => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(report)).into_response()
}

/// `alert` パラメータ（無い・解釈できない場合は 0）
fn alert_param(params: &[(String, String)]) -> u128 {
    query_param(params, ALERT_QUERY_PARAM)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
