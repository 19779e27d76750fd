//! 連結演算子と拡張系トレイト

use super::dynamic_string::{terminated, SENTINEL};
use super::DynamicString;
use std::ops::{Add, AddAssign};

/// 2つの内容を連結した新しい動的文字列を作成
///
/// 合計長で事前確保するため途中の再確保は起きない
fn concatenated(first: &[u8], second: &[u8]) -> DynamicString {
    let first = terminated(first);
    let second = terminated(second);
    let total = first
        .len()
        .checked_add(second.len())
        .unwrap_or_else(|| panic!("capacity overflow"));

    let mut result = DynamicString::with_capacity(total);
    result.concatenate(first);
    result.concatenate(second);
    result
}

impl Add<&DynamicString> for &DynamicString {
    type Output = DynamicString;

    fn add(self, rhs: &DynamicString) -> DynamicString {
        concatenated(self.as_bytes(), rhs.as_bytes())
    }
}

impl Add<&str> for &DynamicString {
    type Output = DynamicString;

    fn add(self, rhs: &str) -> DynamicString {
        concatenated(self.as_bytes(), rhs.as_bytes())
    }
}

impl Add<&DynamicString> for &str {
    type Output = DynamicString;

    fn add(self, rhs: &DynamicString) -> DynamicString {
        concatenated(self.as_bytes(), rhs.as_bytes())
    }
}

impl Add<&str> for DynamicString {
    type Output = DynamicString;

    fn add(mut self, rhs: &str) -> DynamicString {
        self.concatenate(rhs);
        self
    }
}

impl AddAssign<&str> for DynamicString {
    fn add_assign(&mut self, rhs: &str) {
        self.concatenate(rhs);
    }
}

impl AddAssign<&DynamicString> for DynamicString {
    fn add_assign(&mut self, rhs: &DynamicString) {
        self.concatenate(rhs);
    }
}

impl AddAssign<u8> for DynamicString {
    fn add_assign(&mut self, rhs: u8) {
        self.push(rhs);
    }
}

impl Extend<u8> for DynamicString {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > 0 {
            self.grow_to_fit(self.len().saturating_add(lower));
        }
        // 終端文字は内容に保持できないため読み飛ばす
        for byte in iter.filter(|&byte| byte != SENTINEL) {
            self.push(byte);
        }
    }
}

impl<'a> Extend<&'a u8> for DynamicString {
    fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl FromIterator<u8> for DynamicString {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut string = DynamicString::new();
        string.extend(iter);
        string
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_two_strings() {
        let hello = DynamicString::from("Hello, ");
        let world = DynamicString::from("World!");
        let result = &hello + &world;

        assert_eq!(result, "Hello, World!");
        assert_eq!(result.capacity(), 13);
        assert_eq!(hello, "Hello, ");
        assert_eq!(world, "World!");
    }

    #[test]
    fn test_add_text_on_either_side() {
        let name = DynamicString::from("dynstr");

        let suffixed = &name + ".rs";
        assert_eq!(suffixed, "dynstr.rs");
        assert_eq!(suffixed.capacity(), 9);

        let prefixed = "lib" + &name;
        assert_eq!(prefixed, "libdynstr");
        assert_eq!(name, "dynstr");
    }

    #[test]
    fn test_add_with_hollow_operand() {
        let hollow = DynamicString::hollow();
        let result = &hollow + "text";
        assert_eq!(result, "text");
        assert!(!result.is_hollow());

        let empty = &hollow + &hollow;
        assert_eq!(empty, "");
        assert_eq!(empty.capacity(), 1);
    }

    #[test]
    fn test_owned_add_and_add_assign() {
        let mut string = DynamicString::from("a") + "b";
        string += "c";
        string += &DynamicString::from("d");
        string += b'e';
        assert_eq!(string, "abcde");
    }

    #[test]
    fn test_extend_and_collect() {
        let mut string: DynamicString = b"abc".iter().copied().collect();
        assert_eq!(string, "abc");

        string.extend(b"def");
        assert_eq!(string, "abcdef");
        assert!(string.capacity() >= 6);
    }

    #[test]
    fn test_extend_and_collect_skip_sentinel() {
        let string: DynamicString = b"a\0b".iter().copied().collect();
        assert_eq!(string, "ab");

        let mut string = DynamicString::from("x");
        string.extend(&[0, b'y', 0]);
        assert_eq!(string, "xy");
    }
}
