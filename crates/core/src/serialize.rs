//! JSON text rendering and parsing
//!
//! `Value` and `Document` implement serde by hand so that key insertion
//! order survives a round trip. Text produced by [`Document::to_text`] never
//! contains the reserved top-level keys [`TEST_CASE_KEY`] and [`STEP_KEY`];
//! those sub-contexts are persisted separately by the session layer.

use crate::document::Document;
use crate::error::Result;
use crate::value::Value;
use base64::Engine;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use tracing::debug;

/// Reserved key holding the test-case bound sub-context
pub const TEST_CASE_KEY: &str = "tc";

/// Reserved key holding the step bound sub-context
pub const STEP_KEY: &str = "sp";

/// Keys stripped from text rendering
pub const RESERVED_KEYS: [&str; 2] = [TEST_CASE_KEY, STEP_KEY];

/// Key under which a non-object JSON root is stored
pub const PARSED_KEY: &str = "parsed";

/// Check if a top-level key is reserved
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

pub(crate) fn encode_bytes(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

impl Document {
    /// Render as compact JSON, without reserved keys
    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(&Stripped(self))?)
    }

    /// Render as indented JSON, without reserved keys
    pub fn to_text_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Stripped(self))?)
    }

    /// Load JSON text into this document
    ///
    /// Blank text is a no-op. Each entry of an object root is assigned to
    /// its literal top-level key, so `{"a.b": 1}` keeps the key `a.b` and
    /// text from [`Document::to_text`] reproduces the same tree. Any other
    /// root is stored under [`PARSED_KEY`]. Reserved keys in the input are
    /// ignored. Assignments record history like a top-level `put`.
    pub fn from_text(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<Value>(text)? {
            Value::Object(parsed) => {
                for (key, value) in parsed {
                    if is_reserved_key(&key) {
                        debug!(target: "ctxdoc::document", key = %key, "Ignoring reserved key in text");
                        continue;
                    }
                    self.assign_key(key, value)?;
                }
                Ok(())
            }
            other => self.assign_key(PARSED_KEY.to_string(), other).map(|_| ()),
        }
    }

    /// Parse JSON text into a new document
    pub fn parse(text: &str) -> Result<Document> {
        let mut doc = Document::new();
        doc.from_text(text)?;
        Ok(doc)
    }

    /// Copy of this document without the reserved keys
    pub fn without_reserved(&self) -> Document {
        self.iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }
}

/// Serializes a document minus its reserved top-level keys
struct Stripped<'a>(&'a Document);

impl Serialize for Stripped<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let kept = self.0.iter().filter(|(key, _)| !is_reserved_key(key));
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in kept {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Serialize
// =============================================================================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&encode_bytes(b)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(doc) => doc.serialize(serializer),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Deserialize
// =============================================================================

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<Value, E> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> std::result::Result<Value, E> {
        Ok(Value::Bytes(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<Value, A::Error> {
        DocumentVisitor.visit_map(map).map(Value::Object)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_any(ValueVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Document, A::Error> {
        let mut doc = Document::new();
        // Duplicate keys: last one wins, first position kept
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            doc.insert(key, value);
        }
        Ok(doc)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_map(DocumentVisitor)
    }
}
