//! 共通型定義
//!
//! BlockHeight, SamplePair, SyncVerdict等のコアデータ型

use crate::error::CommonError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `0x` 接頭辞を外し、残りが空でない16進数字列であることを検証する
fn hex_digits(value: &str) -> Result<&str, CommonError> {
    let digits = value.strip_prefix("0x").ok_or_else(|| {
        CommonError::InvalidHexQuantity(format!("missing 0x prefix: {:?}", value))
    })?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CommonError::InvalidHexQuantity(format!(
            "not a hex integer: {:?}",
            value
        )));
    }

    Ok(digits)
}

/// ブロック高
///
/// JSON-RPCでは `0x` 接頭辞付きの16進文字列（桁数不定、先頭ゼロ可）として
/// やり取りされる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// `0x` 接頭辞付き16進文字列をデコードする
    ///
    /// 接頭辞は小文字の `0x` のみ受け付ける。桁が空、符号付き、16進以外の文字を含む、
    /// または64bitに収まらない値はエラー。
    pub fn from_hex(value: &str) -> Result<Self, CommonError> {
        let digits = hex_digits(value)?;
        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| CommonError::InvalidHexQuantity(format!("{:?}: {}", value, e)))
    }

    /// 先頭ゼロなしの小文字16進表記（`0x0`, `0x65` など）
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// 10進値
    pub fn value(self) -> u64 {
        self.0
    }
}

impl FromStr for BlockHeight {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1回分のRPCサンプル
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSample {
    /// デコード済みブロック高
    pub height: BlockHeight,
    /// ノードが返した `result` の生文字列
    pub raw_result: String,
    /// JSON-RPCリクエストID（ログ相関用）
    pub request_id: u32,
    /// サンプル取得時刻
    pub sampled_at: DateTime<Utc>,
}

/// 一定間隔をあけて取得した2つのブロック高
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePair {
    /// 1回目のサンプル
    pub first: BlockHeight,
    /// 2回目のサンプル
    pub second: BlockHeight,
}

impl SamplePair {
    /// 新しいサンプルペアを作成
    pub fn new(first: BlockHeight, second: BlockHeight) -> Self {
        Self { first, second }
    }

    /// second - first（u64の全範囲で溢れない）
    pub fn delta(&self) -> i128 {
        i128::from(self.second.0) - i128::from(self.first.0)
    }

    /// 判定結果
    ///
    /// 差分が0以外なら `Synced`。差分が負（reorgや別ノードへの切り替え）でも
    /// `Synced` 扱いになる。
    pub fn verdict(&self) -> SyncVerdict {
        if self.delta() != 0 {
            SyncVerdict::Synced
        } else {
            SyncVerdict::NotSynced
        }
    }
}

/// 同期判定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncVerdict {
    /// ブロック高が変化した
    Synced,
    /// ブロック高が変化していない
    NotSynced,
}

impl SyncVerdict {
    /// 同期中かどうか
    pub fn is_synced(self) -> bool {
        matches!(self, Self::Synced)
    }
}

/// プローブ結果（HTTPレスポンスボディ）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    /// 2回目のサンプルの16進表記
    pub block_number_hex: String,
    /// 2回目のサンプルの10進値
    pub block_number_decimal: u64,
    /// 判定結果
    pub status: SyncVerdict,
}

impl From<SamplePair> for SyncReport {
    fn from(pair: SamplePair) -> Self {
        Self {
            block_number_hex: pair.second.to_hex(),
            block_number_decimal: pair.second.value(),
            status: pair.verdict(),
        }
    }
}

/// `eth_getBlockByNumber` で指定するブロックタグ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// 最新ブロック
    Latest,
    /// ファイナライズ済みブロック
    Finalized,
}

impl BlockTag {
    /// JSON-RPCパラメータとしての文字列
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// finalized と latest のブロック高の差
///
/// 取得に失敗した側は 0 と空文字列で埋める。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockDiffReport {
    /// finalized ブロック高
    pub finalized_block: u64,
    /// latest ブロック高
    pub latest_block: u64,
    /// latest - finalized
    pub difference: i128,
    /// finalized ブロック高の16進表記
    pub finalized_hex: String,
    /// latest ブロック高の16進表記
    pub latest_hex: String,
}

impl BlockDiffReport {
    /// 両方のブロック高から作成
    pub fn new(finalized: BlockHeight, latest: BlockHeight) -> Self {
        Self {
            finalized_block: finalized.value(),
            latest_block: latest.value(),
            difference: i128::from(latest.value()) - i128::from(finalized.value()),
            finalized_hex: finalized.to_hex(),
            latest_hex: latest.to_hex(),
        }
    }

    /// finalized の取得に失敗した場合のボディ
    pub fn unavailable() -> Self {
        Self {
            finalized_block: 0,
            latest_block: 0,
            difference: 0,
            finalized_hex: String::new(),
            latest_hex: String::new(),
        }
    }

    /// latest の取得に失敗した場合のボディ
    pub fn finalized_only(finalized: BlockHeight) -> Self {
        Self {
            finalized_block: finalized.value(),
            finalized_hex: finalized.to_hex(),
            ..Self::unavailable()
        }
    }

    /// 差分が閾値未満か（閾値と等しい場合は false）
    pub fn is_within(&self, max_difference: i64) -> bool {
        self.difference < i128::from(max_difference)
    }
}

/// アカウント残高（wei）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(pub u128);

impl Balance {
    /// `0x` 接頭辞付き16進文字列をデコードする（128bitまで）
    pub fn from_hex(value: &str) -> Result<Self, CommonError> {
        let digits = hex_digits(value)?;
        u128::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| CommonError::InvalidHexQuantity(format!("{:?}: {}", value, e)))
    }

    /// 先頭ゼロなしの小文字16進表記
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// 10進値
    pub fn value(self) -> u128 {
        self.0
    }
}

/// 残高判定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// 残高が閾値を上回る
    BalanceSufficient,
    /// 残高が閾値以下
    BalanceLow,
    /// 残高を取得できなかった
    Error,
}

/// 残高チェック結果（HTTPレスポンスボディ）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceReport {
    /// 対象アドレス（クエリの値そのまま）
    pub address: String,
    /// 残高の16進表記
    pub balance: String,
    /// 残高の10進値
    pub balance_decimal: u128,
    /// アラート閾値
    pub alert_threshold: u128,
    /// 判定結果
    pub status: BalanceStatus,
}

impl BalanceReport {
    /// 取得した残高と閾値から作成
    ///
    /// 閾値と等しい残高は `BalanceLow`。
    pub fn new(address: String, balance: Balance, alert_threshold: u128) -> Self {
        let status = if alert_threshold < balance.value() {
            BalanceStatus::BalanceSufficient
        } else {
            BalanceStatus::BalanceLow
        };
        Self {
            address,
            balance: balance.to_hex(),
            balance_decimal: balance.value(),
            alert_threshold,
            status,
        }
    }

    /// 残高取得に失敗した場合のボディ
    pub fn unavailable(address: String, alert_threshold: u128) -> Self {
        Self {
            address,
            balance: Balance(0).to_hex(),
            balance_decimal: 0,
            alert_threshold,
            status: BalanceStatus::Error,
        }
    }
}
