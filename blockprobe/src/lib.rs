//! blockprobe
//!
//! ブロックチェーンノードがブロックを取り込み続けているかを判定するHTTPプローブ

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// 環境変数による設定
pub mod config;

/// ブロック進行判定
pub mod liveness;

/// ログ初期化
pub mod logging;

/// JSON-RPCクライアント
pub mod rpc;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// ライブネスプローバー
    pub prober: Arc<liveness::LivenessProber>,
    /// 単発クエリ用のRPCクライアント（プローバーと接続プールを共有）
    pub rpc: rpc::RpcClient,
}

impl AppState {
    /// 新しいアプリケーション状態を作成
    pub fn new(prober: liveness::LivenessProber) -> Self {
        let rpc = prober.rpc().clone();
        Self {
            prober: Arc::new(prober),
            rpc,
        }
    }
}
