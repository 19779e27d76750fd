//! エラーハンドリングシステム
//!
//! dynstr 全体で使用される統一されたエラー型とユーティリティを定義
//! 呼び出し側の誤り（範囲外アクセスなど）は panic、入出力や設定の失敗は `Result` で伝播する

use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum DynStrError {
    /// バッファ操作エラー
    #[error("Buffer operation failed: {0}")]
    Buffer(#[from] BufferError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 入出力エラー
    #[error("IO error: {message}")]
    Io { message: String },
}

/// バッファ操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    #[error("Operation requires storage but the string is hollow")]
    Hollow,

    #[error("Capacity overflow")]
    CapacityOverflow,

    #[error("Allocation of capacity {capacity} failed")]
    AllocationFailed { capacity: usize },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing value for {flag}")]
    MissingValue { flag: String },

    #[error("Invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },

    #[error("Unknown flag: {flag}")]
    UnknownFlag { flag: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Warning,
    Error,
    Fatal,
}

impl DynStrError {
    /// エラーの重大度
    pub fn level(&self) -> ErrorLevel {
        match self {
            DynStrError::Buffer(BufferError::AllocationFailed { .. })
            | DynStrError::Buffer(BufferError::CapacityOverflow) => ErrorLevel::Fatal,
            DynStrError::Config(ConfigError::UnknownFlag { .. }) => ErrorLevel::Warning,
            _ => ErrorLevel::Error,
        }
    }
}

/// 重大度に応じてエラーをログに出力
pub fn report(error: &DynStrError) {
    match error.level() {
        ErrorLevel::Fatal => log::error!("fatal: {}", error),
        ErrorLevel::Error => log::error!("{}", error),
        ErrorLevel::Warning => log::warn!("{}", error),
    }
}

/// パニックハンドラの設定
///
/// 契約違反は即座に報告して終了する
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let (file, line) = panic_info
            .location()
            .map(|location| (location.file(), location.line()))
            .unwrap_or(("unknown", 0));

        let message: &str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("panic at {}:{}: {}", file, line, message);
        eprintln!("PANIC at {}:{}: {}", file, line, message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, DynStrError>;

/// 各モジュール固有のResult型
pub mod buffer {
    pub type Result<T> = std::result::Result<T, super::BufferError>;
}

pub mod config {
    pub type Result<T> = std::result::Result<T, super::ConfigError>;
}

// std::io::Error から DynStrError への変換
impl From<std::io::Error> for DynStrError {
    fn from(error: std::io::Error) -> Self {
        DynStrError::Io { message: error.to_string() }
    }
}
