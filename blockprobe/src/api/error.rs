//! APIエラーレスポンス型

use axum::{http::StatusCode, response::IntoResponse};
use blockprobe_common::error::ProbeError;
use tracing::warn;

/// Axum用のエラーレスポンス型
///
/// どのエラーも 500 + 空ボディに集約する。詳細はログにのみ出力する。
#[derive(Debug)]
pub struct AppError(pub ProbeError);

impl From<ProbeError> for AppError {
    fn from(err: ProbeError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        warn!(kind = self.0.kind(), error = %self.0, "Liveness check failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
