//! 動的文字列の並び替え用比較

use super::DynamicString;
use std::cmp::{Ordering, Reverse};

/// 2つの動的文字列の順序を決める比較器
pub trait BufferOrdering {
    fn compare(&self, first: &DynamicString, second: &DynamicString) -> Ordering;

    /// `first` が `second` より前に並ぶか
    fn is_before(&self, first: &DynamicString, second: &DynamicString) -> bool {
        self.compare(first, second) == Ordering::Less
    }
}

/// 大文字小文字を無視した逆辞書順
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseCaseInsensitive;

impl BufferOrdering for ReverseCaseInsensitive {
    fn compare(&self, first: &DynamicString, second: &DynamicString) -> Ordering {
        compare_reversed_case_insensitive(first, second)
    }
}

fn folded(string: &DynamicString) -> impl Iterator<Item = Reverse<u8>> + '_ {
    string.iter().map(|byte| Reverse(byte.to_ascii_lowercase()))
}

/// 大文字小文字を無視した逆辞書順で比較
///
/// 最初に異なる位置で大きい文字を持つ方が前に並ぶ。
/// 一方が他方の接頭辞なら短い方が前に並ぶ。
pub fn compare_reversed_case_insensitive(first: &DynamicString, second: &DynamicString) -> Ordering {
    folded(first).cmp(folded(second))
}

/// 並び替え用の述語（`first` が前に並ぶなら true）
pub fn lexicographical_reversed_case_insensitive(first: &DynamicString, second: &DynamicString) -> bool {
    ReverseCaseInsensitive.is_before(first, second)
}

/// 大文字小文字を無視した逆辞書順で並び替え（安定）
pub fn sort_reversed_case_insensitive(strings: &mut [DynamicString]) {
    strings.sort_by(compare_reversed_case_insensitive);
}
