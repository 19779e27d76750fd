//! serde 対応
//!
//! UTF-8 として妥当なら文字列、そうでなければバイト列として直列化する。
//! 空洞状態は `None` として扱う

use super::dynamic_string::SENTINEL;
use super::DynamicString;
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// 長さの申告に基づく事前確保の上限
const MAX_PREALLOCATED_CAPACITY: usize = 4096;

impl Serialize for DynamicString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.characters() {
            None => serializer.serialize_none(),
            Some(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => serializer.serialize_str(text),
                Err(_) => serializer.serialize_bytes(bytes),
            },
        }
    }
}

struct DynamicStringVisitor;

impl<'de> Visitor<'de> for DynamicStringVisitor {
    type Value = DynamicString;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, a byte sequence or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(DynamicString::from(value))
    }

    fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
        Ok(DynamicString::from_bytes(value))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DynamicString::hollow())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DynamicString::hollow())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let capacity = seq
            .size_hint()
            .unwrap_or(0)
            .min(MAX_PREALLOCATED_CAPACITY);
        let mut string = DynamicString::with_capacity(capacity);

        // 終端文字以降は読み捨てる
        let mut terminated = false;
        while let Some(byte) = seq.next_element::<u8>()? {
            if byte == SENTINEL {
                terminated = true;
            }
            if !terminated {
                string.push(byte);
            }
        }
        Ok(string)
    }
}

impl<'de> Deserialize<'de> for DynamicString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DynamicStringVisitor)
    }
}
