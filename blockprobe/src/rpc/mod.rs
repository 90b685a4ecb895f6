//! ノードJSON-RPCクライアント
//!
//! `eth_blockNumber` / `eth_getBlockByNumber` / `eth_getBalance` を1回ずつ呼び出す。
//! リトライはしない。

use crate::config::DEFAULT_RPC_URL;
use blockprobe_common::{
    error::{CommonError, ProbeError},
    protocol::{BlockHeader, JsonRpcRequest, JsonRpcResponse},
    types::{Balance, BlockHeight, BlockSample, BlockTag},
};
use chrono::Utc;
use rand::Rng;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use tracing::{debug, info};

/// JSON-RPCクライアント
///
/// デフォルトではタイムアウトを設定しない。応答しないノードに対しては
/// 呼び出しが無期限にブロックする。
#[derive(Debug, Clone, Default)]
pub struct RpcClient {
    client: Client,
}

impl RpcClient {
    /// タイムアウト無しのクライアントを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// リクエスト全体にタイムアウトを設定したクライアントを作成
    ///
    /// 期限切れは `ProbeError::Timeout` になる。
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// 空のエンドポイントをデフォルトに置き換える
    pub fn resolve_endpoint(endpoint: &str) -> &str {
        if endpoint.is_empty() {
            DEFAULT_RPC_URL
        } else {
            endpoint
        }
    }

    /// ノードの現在のブロック高を取得
    pub async fn fetch_block_number(&self, endpoint: &str) -> Result<BlockSample, ProbeError> {
        let request_id = next_request_id();
        let sampled_at = Utc::now();

        let raw_result = self
            .call(endpoint, &JsonRpcRequest::block_number(request_id))
            .await?
            .into_quantity()?;

        debug!(%sampled_at, request_id, result = %raw_result, "Block number (hex)");

        let height = BlockHeight::from_hex(&raw_result)?;

        info!(
            %sampled_at,
            request_id,
            block_number_hex = %raw_result,
            block_number = height.value(),
            "Fetched block number"
        );

        Ok(BlockSample {
            height,
            raw_result,
            request_id,
            sampled_at,
        })
    }

    /// タグ（`latest` / `finalized`）で指定したブロックの高さを取得
    ///
    /// 該当ブロックが無い（`result: null`）場合はプロトコルエラー。
    pub async fn fetch_block_by_tag(
        &self,
        endpoint: &str,
        tag: BlockTag,
    ) -> Result<BlockHeight, ProbeError> {
        let request_id = next_request_id();

        let result = self
            .call(endpoint, &JsonRpcRequest::block_by_tag(request_id, tag))
            .await?
            .into_result()?;
        let number = BlockHeader::number_from_result(result)?;
        let height = BlockHeight::from_hex(&number)?;

        info!(
            request_id,
            %tag,
            block_number_hex = %number,
            block_number = height.value(),
            "Fetched tagged block"
        );

        Ok(height)
    }

    /// アドレスの最新残高（wei）を取得
    pub async fn fetch_balance(&self, endpoint: &str, address: &str) -> Result<Balance, ProbeError> {
        let request_id = next_request_id();

        let raw_result = self
            .call(endpoint, &JsonRpcRequest::balance(request_id, address))
            .await?
            .into_quantity()?;
        let balance = Balance::from_hex(&raw_result)?;

        debug!(request_id, address, balance = %raw_result, "Fetched balance");

        Ok(balance)
    }

    /// JSON-RPCを1回呼び出してレスポンスのエンベロープを返す
    async fn call(
        &self,
        endpoint: &str,
        request: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, ProbeError> {
        let url = Self::resolve_endpoint(endpoint);
        let payload = serde_json::to_vec(request).map_err(CommonError::from)?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| map_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(
                url,
                request_id = request.id,
                method = %request.method,
                status = status.as_u16(),
                "Node returned error status"
            );
            return Err(ProbeError::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| map_request_error(url, e))?;

        serde_json::from_slice(&body).map_err(|e| {
            ProbeError::Protocol(format!("Failed to decode JSON-RPC response: {}", e))
        })
    }
}

fn next_request_id() -> u32 {
    rand::thread_rng().gen_range(0..100)
}

fn map_request_error(url: &str, err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout(format!("{}: {}", url, err))
    } else {
        ProbeError::Transport(format!("{}: {}", url, err))
    }
}
