//! 動的文字列モジュール
//!
//! 容量管理付きの動的文字列本体、連結演算子、比較器、ストリーム入出力を提供

pub mod comparator;
mod concat;
pub mod dynamic_string;
mod serde_impl;
mod stream;

// 公開API
pub use comparator::{
    compare_reversed_case_insensitive, lexicographical_reversed_case_insensitive,
    sort_reversed_case_insensitive, BufferOrdering, ReverseCaseInsensitive,
};
pub use dynamic_string::{DynamicString, Iter, DEFAULT_CAPACITY, GROWTH_FACTOR, SENTINEL};
pub use crate::error::BufferError;
