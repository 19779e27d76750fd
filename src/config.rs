//! 並び替えデモの設定
//!
//! コマンドライン引数を解析して `SortOptions` を構築する

use crate::error::{config, ConfigError};
use crate::logging::LogLevel;
use std::path::{Path, PathBuf};

/// 1行あたりの初期容量
pub const DEFAULT_LINE_CAPACITY: usize = 16;

/// 使い方
pub const USAGE: &str = "\
usage: dynstr-sort [options]

Reads lines until an empty line, then prints them sorted in reverse
case-insensitive order.

options:
  --line-capacity <N>  initial capacity of each line (default 16)
  --verbose            log debug and reallocation details
  --quiet              log errors only
  --debug-log [PATH]   append log lines to PATH (default ~/.dynstr-log/debug.log)
  --no-prompt          do not print the prompt and header
  -h, --help           show this help";

/// 並び替えデモのオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
    /// 入力1行ごとの初期容量
    pub line_capacity: usize,
    /// ログレベル
    pub log_level: LogLevel,
    /// ログ出力先（`Some(None)` は既定の場所）
    pub debug_log: Option<Option<PathBuf>>,
    /// プロンプトと見出しを表示するか
    pub show_prompt: bool,
    /// 使い方の表示要求
    pub show_help: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            line_capacity: DEFAULT_LINE_CAPACITY,
            log_level: LogLevel::Warning,
            debug_log: None,
            show_prompt: true,
            show_help: false,
        }
    }
}

impl SortOptions {
    /// 引数列から構築（プログラム名は含めない）
    pub fn from_args(args: &[String]) -> config::Result<Self> {
        let mut options = Self::default();

        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--line-capacity" => {
                    let value = iter.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;
                    options.line_capacity = value.parse().map_err(|_| ConfigError::InvalidValue {
                        flag: arg.clone(),
                        value: value.clone(),
                    })?;
                }
                "--verbose" => options.log_level = LogLevel::Debug,
                "--quiet" => options.log_level = LogLevel::Error,
                "--debug-log" => {
                    let path = iter
                        .next_if(|next| !next.starts_with('-'))
                        .map(PathBuf::from);
                    options.debug_log = Some(path);
                }
                "--no-prompt" => options.show_prompt = false,
                "-h" | "--help" => options.show_help = true,
                _ => {
                    return Err(ConfigError::UnknownFlag { flag: arg.clone() });
                }
            }
        }

        Ok(options)
    }

    /// ログファイルの出力先を解決
    pub fn resolve_log_path(&self) -> Option<PathBuf> {
        match &self.debug_log {
            Some(Some(path)) => Some(path.clone()),
            Some(None) => default_log_path(),
            None => None,
        }
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".dynstr-log").join("debug.log"))
}

/// ヘルパー：親ディレクトリを作成
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
