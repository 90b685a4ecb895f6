//! ログ初期化
//!
//! `BLOCKPROBE_LOG_LEVEL`、次に `RUST_LOG` をフィルタとして使う。どちらも無ければ `info`。
//! 解釈できない指定は `info` に置き換え、初期化後に警告を出す。

use crate::config::get_env;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// ログレベル指定用の環境変数
pub const LOG_LEVEL_ENV: &str = "BLOCKPROBE_LOG_LEVEL";

const DEFAULT_DIRECTIVE: &str = "info";

/// tracing-subscriberを初期化する
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let directive = resolve_directive(get_env(LOG_LEVEL_ENV), get_env("RUST_LOG"));
    let (filter, rejected) = build_filter(&directive);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()?;

    if let Some(error) = rejected {
        warn!(
            directive = %directive,
            error = %error,
            fallback = DEFAULT_DIRECTIVE,
            "Invalid log filter, using default"
        );
    }

    Ok(())
}

fn resolve_directive(primary: Option<String>, fallback: Option<String>) -> String {
    primary
        .or(fallback)
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// フィルタを構築する。解釈できなければデフォルトとエラー内容を返す
fn build_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_DIRECTIVE), Some(e.to_string())),
    }
}
