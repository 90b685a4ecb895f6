//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! 呼び出し元には詳細を返さない。`Display` の内容はサーバーログ専用。

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Value is not a valid `0x`-prefixed hex integer
    #[error("Invalid hex quantity: {0}")]
    InvalidHexQuantity(String),
}

/// Node probe error type
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Endpoint unreachable, connection reset or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Outbound call exceeded the configured deadline
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Node answered with a non-2xx HTTP status
    #[error("Upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    /// Response body is not a usable JSON-RPC envelope
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ProbeError {
    /// ログ出力用のエラー分類
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Common(CommonError::Serialization(_)) => "serialization",
            Self::Common(CommonError::InvalidHexQuantity(_)) => "encoding",
            Self::Transport(_) | Self::Timeout(_) => "transport",
            Self::UpstreamStatus(_) | Self::Protocol(_) => "protocol",
        }
    }
}
