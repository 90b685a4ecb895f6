//! 通信プロトコル定義
//!
//! プローブ ↔ ノード間のJSON-RPC 2.0メッセージ

use crate::error::ProbeError;
use crate::types::BlockTag;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPCバージョン
pub const JSONRPC_VERSION: &str = "2.0";

/// ブロック高取得メソッド
pub const METHOD_BLOCK_NUMBER: &str = "eth_blockNumber";

/// タグ指定のブロック取得メソッド
pub const METHOD_GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";

/// 残高取得メソッド
pub const METHOD_GET_BALANCE: &str = "eth_getBalance";

/// JSON-RPCリクエスト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    /// プロトコルバージョン（常に "2.0"）
    pub jsonrpc: String,
    /// メソッド名
    pub method: String,
    /// パラメータ
    pub params: Vec<Value>,
    /// リクエストID（ログ相関用、一意性は不要）
    pub id: u32,
}

impl JsonRpcRequest {
    fn new(method: &str, params: Vec<Value>, id: u32) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
            id,
        }
    }

    /// `eth_blockNumber` リクエストを作成
    pub fn block_number(id: u32) -> Self {
        Self::new(METHOD_BLOCK_NUMBER, Vec::new(), id)
    }

    /// `eth_getBlockByNumber(tag, false)` リクエストを作成（トランザクション本体は不要）
    pub fn block_by_tag(id: u32, tag: BlockTag) -> Self {
        Self::new(
            METHOD_GET_BLOCK_BY_NUMBER,
            vec![Value::from(tag.as_str()), Value::Bool(false)],
            id,
        )
    }

    /// `eth_getBalance(address, "latest")` リクエストを作成
    pub fn balance(id: u32, address: &str) -> Self {
        Self::new(
            METHOD_GET_BALANCE,
            vec![Value::from(address), Value::from(BlockTag::Latest.as_str())],
            id,
        )
    }
}

/// JSON-RPCエラーオブジェクト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcErrorObject {
    /// エラーコード
    pub code: i64,
    /// エラーメッセージ
    pub message: String,
}

/// JSON-RPCレスポンス
///
/// `eth_blockNumber` / `eth_getBalance` の `result` は16進文字列（例: "0x5B9AC0"）、
/// `eth_getBlockByNumber` はブロックオブジェクト（該当なしは `null`）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    /// プロトコルバージョン
    #[serde(default)]
    pub jsonrpc: String,
    /// リクエストID
    #[serde(default)]
    pub id: Option<Value>,
    /// 成功時の結果（`null` は `None`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// 失敗時のエラー
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    /// `result` を取り出す。`error` が含まれる、または `result` が無い/`null` の場合はプロトコルエラー
    pub fn into_result(self) -> Result<Value, ProbeError> {
        if let Some(error) = self.error {
            return Err(ProbeError::Protocol(format!(
                "JSON-RPC error {}: {}",
                error.code, error.message
            )));
        }
        self.result
            .ok_or_else(|| ProbeError::Protocol("response has no result field".to_string()))
    }

    /// 16進文字列の `result` を取り出す
    pub fn into_quantity(self) -> Result<String, ProbeError> {
        match self.into_result()? {
            Value::String(quantity) => Ok(quantity),
            other => Err(ProbeError::Protocol(format!(
                "result is not a hex string: {}",
                other
            ))),
        }
    }
}

/// `eth_getBlockByNumber` の結果のうち必要なフィールド
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockHeader {
    /// ブロック高（16進文字列）
    #[serde(default)]
    pub number: Option<String>,
}

impl BlockHeader {
    /// `result` のブロックオブジェクトから `number` を取り出す
    pub fn number_from_result(result: Value) -> Result<String, ProbeError> {
        let header: BlockHeader = serde_json::from_value(result)
            .map_err(|e| ProbeError::Protocol(format!("invalid block object: {}", e)))?;
        header
            .number
            .ok_or_else(|| ProbeError::Protocol("block has no number field".to_string()))
    }
}
