//! REST APIハンドラー
//!
//! `/finalized_latest_diff` と `/check_balance` 以外のパスは、メソッドを問わず
//! ライブネスチェックで処理する。

pub mod balance;
pub mod error;
pub mod finality;
pub mod sync;

use crate::AppState;
use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

/// 対象ノードを指定するクエリパラメータ名
pub const RPC_QUERY_PARAM: &str = "rpc";

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(sync::check_sync))
        .route("/finalized_latest_diff", get(finality::check_finality_gap))
        .route("/check_balance", get(balance::check_balance))
        .fallback(sync::check_sync)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 最初に現れたクエリパラメータの値
pub(crate) fn query_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// 最初に現れた `rpc` パラメータ（無ければ空文字列）
pub(crate) fn rpc_param(params: &[(String, String)]) -> &str {
    query_param(params, RPC_QUERY_PARAM).unwrap_or("")
}
