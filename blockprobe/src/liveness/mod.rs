//! ブロック進行によるライブネス判定
//!
//! 同じエンドポイントから一定間隔をあけて2回ブロック高を取得し、
//! 値が変化していれば synced とみなす。

use crate::config::SAMPLE_INTERVAL;
use crate::rpc::RpcClient;
use blockprobe_common::{
    error::ProbeError,
    types::{SamplePair, SyncReport},
};
use std::time::Duration;
use tracing::{debug, info};

/// ライブネスプローバー
///
/// リクエスト間で共有する可変状態は持たない。待機はリクエストのタスク内でのみ行う。
#[derive(Debug, Clone)]
pub struct LivenessProber {
    rpc: RpcClient,
    sample_interval: Duration,
}

impl LivenessProber {
    /// 30秒間隔のプローバーを作成
    pub fn new(rpc: RpcClient) -> Self {
        Self {
            rpc,
            sample_interval: SAMPLE_INTERVAL,
        }
    }

    /// サンプル間隔を設定
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// サンプル間隔
    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    /// 内部のRPCクライアント
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// 2回サンプリングして判定する
    ///
    /// どちらかのサンプルが失敗した時点でエラーを返す。
    pub async fn check(&self, endpoint: &str) -> Result<SyncReport, ProbeError> {
        let first = self.rpc.fetch_block_number(endpoint).await?;

        debug!(
            interval_ms = self.sample_interval.as_millis() as u64,
            "Waiting before second sample"
        );
        tokio::time::sleep(self.sample_interval).await;

        let second = self.rpc.fetch_block_number(endpoint).await?;

        let pair = SamplePair::new(first.height, second.height);
        let report = SyncReport::from(pair);

        info!(
            endpoint = RpcClient::resolve_endpoint(endpoint),
            first = first.height.value(),
            second = second.height.value(),
            delta = %pair.delta(),
            status = ?report.status,
            "Liveness check completed"
        );

        Ok(report)
    }
}
