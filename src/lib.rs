//! dynstr - 容量を手動で制御できる動的文字列
//!
//! 終端文字付きの可変長バイト文字列と、それを使った行の並び替えデモ

// コアモジュール
pub mod error;
pub mod logging;
pub mod config;

// データ層
pub mod buffer;

// アプリケーション層
pub mod sort;

// 公開API
pub use buffer::{BufferOrdering, DynamicString, ReverseCaseInsensitive};
pub use error::{DynStrError, Result};
