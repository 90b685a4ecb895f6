//! blockprobe 共通ライブラリ
//!
//! プローブサーバーとJSON-RPCノードの間で共有する型定義

#![warn(missing_docs)]

/// エラー型定義
pub mod error;

/// JSON-RPC通信プロトコル
pub mod protocol;

/// ブロック高・判定結果などのコアデータ型
pub mod types;
