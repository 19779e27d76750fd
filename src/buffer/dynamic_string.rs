//! 動的文字列実装
//!
//! 容量と長さを明示的に管理する、終端文字付きの可変長バイト文字列

use crate::error::{buffer, BufferError};
use std::alloc::{handle_alloc_error, Layout};
use std::cmp::Ordering;
use std::ffi::CStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};
use std::str::Utf8Error;

/// 既定の容量（終端文字の領域は含まない）
pub const DEFAULT_CAPACITY: usize = 1;
/// 再確保時の容量の成長係数
pub const GROWTH_FACTOR: usize = 2;
/// 論理的な内容の直後に置かれる終端文字
pub const SENTINEL: u8 = b'\0';

/// 読み取り用イテレータ
pub type Iter<'a> = std::iter::Copied<std::slice::Iter<'a, u8>>;

/// 動的文字列
///
/// `capacity + 1` バイトのブロックを単独で所有し、`length` 番目には常に終端文字を置く。
/// ムーブアウト後はストレージを持たない「空洞」状態になる。
pub struct DynamicString {
    /// 所有するブロック（空洞状態では `None`）
    storage: Option<Box<[u8]>>,
    /// 論理的な文字数（終端文字を除く）
    length: usize,
    /// 論理的な内容に使える文字数（終端文字の領域を除く）
    capacity: usize,
}

/// 終端文字より前の部分を取り出す
pub(super) fn terminated(text: &[u8]) -> &[u8] {
    match text.iter().position(|&byte| byte == SENTINEL) {
        Some(end) => &text[..end],
        None => text,
    }
}

fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

fn contract_violation(error: &BufferError) -> ! {
    panic!("dynamic string contract violation: {}", error);
}

/// `capacity + 1` バイトのブロックを確保（全て終端文字で初期化）
fn allocate_block(capacity: usize) -> std::result::Result<Box<[u8]>, BufferError> {
    let slots = capacity
        .checked_add(1)
        .ok_or(BufferError::CapacityOverflow)?;

    let mut block = Vec::new();
    block
        .try_reserve_exact(slots)
        .map_err(|_| BufferError::AllocationFailed { capacity })?;
    block.resize(slots, SENTINEL);

    Ok(block.into_boxed_slice())
}

/// 確保失敗を致命的エラーとして扱うブロック確保
fn allocate_block_or_abort(capacity: usize) -> Box<[u8]> {
    match allocate_block(capacity) {
        Ok(block) => block,
        Err(BufferError::AllocationFailed { capacity }) => {
            match Layout::array::<u8>(capacity.saturating_add(1)) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => capacity_overflow(),
            }
        }
        Err(_) => capacity_overflow(),
    }
}

impl DynamicString {
    /// 空の動的文字列を既定の容量で作成
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 指定容量で空の動的文字列を作成
    ///
    /// 容量 0 は既定の容量に正規化される
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };

        Self {
            storage: Some(allocate_block_or_abort(capacity)),
            length: 0,
            capacity,
        }
    }

    /// ストレージを持たない空洞状態の動的文字列を作成
    pub fn hollow() -> Self {
        Self {
            storage: None,
            length: 0,
            capacity: 0,
        }
    }

    /// バイト列から作成
    ///
    /// 最初の終端文字までを内容として扱う
    pub fn from_bytes(text: &[u8]) -> Self {
        let text = terminated(text);
        let capacity = text.len().max(DEFAULT_CAPACITY);

        let mut block = allocate_block_or_abort(capacity);
        block[..text.len()].copy_from_slice(text);

        Self {
            storage: Some(block),
            length: text.len(),
            capacity,
        }
    }

    /// 省略可能なテキストから作成（`None` なら空洞状態）
    pub fn from_optional<T: AsRef<[u8]>>(text: Option<T>) -> Self {
        match text {
            Some(text) => Self::from_bytes(text.as_ref()),
            None => Self::hollow(),
        }
    }

    /// 文字数（終端文字を除く）
    pub fn len(&self) -> usize {
        self.length
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 現在の容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 空洞状態（ストレージなし）かどうか
    pub fn is_hollow(&self) -> bool {
        self.storage.is_none()
    }

    /// 論理的な内容を取得（空洞状態では `None`）
    pub fn characters(&self) -> Option<&[u8]> {
        self.storage.as_deref().map(|block| &block[..self.length])
    }

    /// 論理的な内容をバイト列として取得（空洞状態では空）
    pub fn as_bytes(&self) -> &[u8] {
        self.characters().unwrap_or(&[])
    }

    /// 終端文字を含む内容を取得
    pub fn as_bytes_with_nul(&self) -> Option<&[u8]> {
        self.storage.as_deref().map(|block| &block[..=self.length])
    }

    /// C 文字列としての表示
    pub fn as_c_str(&self) -> Option<&CStr> {
        self.as_bytes_with_nul()
            .and_then(|bytes| CStr::from_bytes_with_nul(bytes).ok())
    }

    /// UTF-8 文字列として解釈
    pub fn to_str(&self) -> std::result::Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// 指定位置の文字を取得
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// 指定位置の文字への可変参照を取得
    pub fn get_mut(&mut self, index: usize) -> Option<&mut u8> {
        self.characters_mut().and_then(|content| content.get_mut(index))
    }

    /// 先頭から順に文字を返すイテレータ
    pub fn iter(&self) -> Iter<'_> {
        self.as_bytes().iter().copied()
    }

    /// 文字を書き換えるためのイテレータ
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, u8> {
        self.characters_mut().unwrap_or_default().iter_mut()
    }

    /// 指定テキストと内容が等しいか（大文字小文字を区別）
    pub fn equals(&self, text: impl AsRef<[u8]>) -> bool {
        self.as_bytes() == terminated(text.as_ref())
    }

    /// 末尾に文字を追加
    pub fn push(&mut self, character: u8) {
        debug_assert_ne!(character, SENTINEL, "dynamic string cannot hold the sentinel");

        let required = self
            .length
            .checked_add(1)
            .unwrap_or_else(|| capacity_overflow());
        self.grow_to_fit(required);

        let length = self.length;
        let block = self.block_mut();
        block[length] = character;
        block[required] = SENTINEL;
        self.length = required;
    }

    /// 末尾にテキストを連結
    pub fn concatenate(&mut self, text: impl AsRef<[u8]>) {
        let text = terminated(text.as_ref());
        if text.is_empty() {
            return;
        }

        let new_length = self
            .length
            .checked_add(text.len())
            .unwrap_or_else(|| capacity_overflow());
        self.grow_to_fit(new_length);

        let length = self.length;
        let block = self.block_mut();
        block[length..new_length].copy_from_slice(text);
        block[new_length] = SENTINEL;
        self.length = new_length;
    }

    /// 省略可能なテキストを連結（`None` は何もしない）
    pub fn concatenate_optional<T: AsRef<[u8]>>(&mut self, text: Option<T>) {
        if let Some(text) = text {
            self.concatenate(text);
        }
    }

    /// 指定位置に文字を挿入
    ///
    /// `index` は `[0, len)` の範囲でなければならない。範囲外は呼び出し側の誤りとして panic する。
    pub fn insert(&mut self, index: usize, character: u8) {
        self.assert_index(index);

        let required = self
            .length
            .checked_add(1)
            .unwrap_or_else(|| capacity_overflow());
        self.grow_to_fit(required);
        self.insert_within_capacity(index, character);
    }

    /// 指定位置に文字を挿入（検査付き）
    pub fn try_insert(&mut self, index: usize, character: u8) -> buffer::Result<()> {
        self.check_index(index)?;

        let required = self
            .length
            .checked_add(1)
            .ok_or(BufferError::CapacityOverflow)?;
        if required > self.capacity {
            self.try_reallocate(self.grown_capacity(required))?;
        }
        self.insert_within_capacity(index, character);

        Ok(())
    }

    /// 指定位置の文字を削除して返す
    ///
    /// 容量は変化しない。範囲外は呼び出し側の誤りとして panic する。
    pub fn remove(&mut self, index: usize) -> u8 {
        self.assert_index(index);

        let length = self.length;
        let block = self.block_mut();
        let removed = block[index];
        // 終端文字ごと左に詰める
        block.copy_within(index + 1..=length, index);
        self.length -= 1;

        removed
    }

    /// 指定位置の文字を削除して返す（検査付き）
    pub fn try_remove(&mut self, index: usize) -> buffer::Result<u8> {
        self.check_index(index)?;
        Ok(self.remove(index))
    }

    /// 容量を少なくとも `capacity` まで確保し、確保後の容量を返す
    ///
    /// 追加分ではなく総容量を指定する。容量が減ることはない。
    pub fn reserve(&mut self, capacity: usize) -> usize {
        if self.capacity == 0 && capacity == 0 {
            self.reallocate(DEFAULT_CAPACITY);
        } else if capacity > self.capacity {
            self.reallocate(capacity);
        }

        self.capacity
    }

    /// 容量を確保（確保失敗をエラーとして返す）
    pub fn try_reserve(&mut self, capacity: usize) -> buffer::Result<usize> {
        if self.capacity == 0 && capacity == 0 {
            self.try_reallocate(DEFAULT_CAPACITY)?;
        } else if capacity > self.capacity {
            self.try_reallocate(capacity)?;
        }

        Ok(self.capacity)
    }

    /// 内容を空にする（容量は維持）
    pub fn clear(&mut self) {
        if let Some(block) = self.storage.as_deref_mut() {
            block[0] = SENTINEL;
        }
        self.length = 0;
    }

    /// 内容を指定テキストで置き換える
    ///
    /// 容量が足りていればブロックを再利用する
    pub fn assign(&mut self, text: impl AsRef<[u8]>) {
        let text = terminated(text.as_ref());

        self.clear();
        if self.is_hollow() || text.len() > self.capacity {
            self.reallocate(text.len().max(DEFAULT_CAPACITY));
        }
        self.concatenate(text);
    }

    /// ストレージを取り出し、自身を空洞状態にする
    pub fn take(&mut self) -> Self {
        log::debug!(
            "moving dynamic string out (length = {}, capacity = {})",
            self.length,
            self.capacity
        );
        std::mem::replace(self, Self::hollow())
    }

    /// 他方のストレージを引き継ぎ、他方を空洞状態にする
    pub fn move_from(&mut self, other: &mut Self) {
        *self = other.take();
    }

    /// 容量が `required` に満たなければ成長方針に従って再確保
    pub(super) fn grow_to_fit(&mut self, required: usize) {
        if required > self.capacity {
            let new_capacity = self.grown_capacity(required);
            self.reallocate(new_capacity);
        }
    }

    fn grown_capacity(&self, required: usize) -> usize {
        let grown = if self.capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            self.capacity.saturating_mul(GROWTH_FACTOR)
        };

        grown.max(required)
    }

    fn reallocate(&mut self, new_capacity: usize) {
        let new_capacity = if new_capacity == 0 { DEFAULT_CAPACITY } else { new_capacity };
        let block = allocate_block_or_abort(new_capacity);
        self.install_block(block, new_capacity);
    }

    fn try_reallocate(&mut self, new_capacity: usize) -> std::result::Result<(), BufferError> {
        let new_capacity = if new_capacity == 0 { DEFAULT_CAPACITY } else { new_capacity };
        let block = allocate_block(new_capacity)?;
        self.install_block(block, new_capacity);
        Ok(())
    }

    /// 新しいブロックへ内容と終端文字を移し、古いブロックを解放
    fn install_block(&mut self, mut block: Box<[u8]>, new_capacity: usize) {
        debug_assert!(new_capacity >= self.length);

        if let Some(old) = self.storage.as_deref() {
            block[..=self.length].copy_from_slice(&old[..=self.length]);
        }

        log::trace!(
            "reallocating dynamic string: capacity {} -> {} (length = {})",
            self.capacity,
            new_capacity,
            self.length
        );

        self.storage = Some(block);
        self.capacity = new_capacity;
    }

    /// 容量が足りている前提で挿入
    fn insert_within_capacity(&mut self, index: usize, character: u8) {
        debug_assert_ne!(character, SENTINEL, "dynamic string cannot hold the sentinel");

        let length = self.length;
        let block = self.block_mut();
        // 終端文字ごと右にずらす
        block.copy_within(index..=length, index + 1);
        block[index] = character;
        self.length += 1;
    }

    fn check_index(&self, index: usize) -> std::result::Result<(), BufferError> {
        if self.is_hollow() {
            return Err(BufferError::Hollow);
        }
        if index >= self.length {
            return Err(BufferError::IndexOutOfBounds {
                index,
                length: self.length,
            });
        }
        Ok(())
    }

    fn assert_index(&self, index: usize) {
        if let Err(error) = self.check_index(index) {
            contract_violation(&error);
        }
    }

    fn block_mut(&mut self) -> &mut [u8] {
        match self.storage.as_deref_mut() {
            Some(block) => block,
            None => contract_violation(&BufferError::Hollow),
        }
    }

    fn characters_mut(&mut self) -> Option<&mut [u8]> {
        let length = self.length;
        self.storage.as_deref_mut().map(|block| &mut block[..length])
    }
}

impl Default for DynamicString {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DynamicString {
    fn clone(&self) -> Self {
        let storage = self.storage.as_deref().map(|block| {
            let mut copy = allocate_block_or_abort(self.capacity);
            copy[..=self.length].copy_from_slice(&block[..=self.length]);
            copy
        });

        log::debug!(
            "copied dynamic string (length = {}, capacity = {})",
            self.length,
            self.capacity
        );

        Self {
            storage,
            length: self.length,
            capacity: self.capacity,
        }
    }
}

impl fmt::Debug for DynamicString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicString")
            .field("text", &self.characters().map(String::from_utf8_lossy))
            .field("length", &self.length)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl From<&str> for DynamicString {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl From<&[u8]> for DynamicString {
    fn from(text: &[u8]) -> Self {
        Self::from_bytes(text)
    }
}

impl From<String> for DynamicString {
    fn from(text: String) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl AsRef<[u8]> for DynamicString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Index<usize> for DynamicString {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        self.assert_index(index);
        &self.as_bytes()[index]
    }
}

impl IndexMut<usize> for DynamicString {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        self.assert_index(index);
        &mut self.block_mut()[index]
    }
}

impl<'a> IntoIterator for &'a DynamicString {
    type Item = u8;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut DynamicString {
    type Item = &'a mut u8;
    type IntoIter = std::slice::IterMut<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl PartialEq for DynamicString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DynamicString {}

impl PartialEq<str> for DynamicString {
    fn eq(&self, other: &str) -> bool {
        self.equals(other)
    }
}

impl PartialEq<&str> for DynamicString {
    fn eq(&self, other: &&str) -> bool {
        self.equals(other)
    }
}

impl PartialEq<[u8]> for DynamicString {
    fn eq(&self, other: &[u8]) -> bool {
        self.equals(other)
    }
}

impl PartialEq<DynamicString> for &str {
    fn eq(&self, other: &DynamicString) -> bool {
        other.equals(self)
    }
}

impl Hash for DynamicString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl PartialOrd for DynamicString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DynamicString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}
