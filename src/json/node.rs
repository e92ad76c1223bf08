//! JSON tree that keeps every object member
//!
//! `serde_json::Value` stores objects in a map, so a repeated key keeps only
//! its last value. Feature-control responses are walked member by member and
//! a repeated `tr181.` key must still produce one line per occurrence, so the
//! response is parsed into [`JsonNode`] instead, where an object is the list
//! of its members in document order.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;
use std::fmt;

/// A parsed JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonNode>),
    /// Members in document order; keys may repeat
    Object(Vec<(String, JsonNode)>),
}

impl JsonNode {
    /// Parses JSON text.
    ///
    /// ```
    /// use featurectl::json::JsonNode;
    ///
    /// let node = JsonNode::parse(br#"{"k": "first", "k": "second"}"#).unwrap();
    /// assert_eq!(node.members().map(|m| m.len()), Some(2));
    /// assert_eq!(node.get("k").and_then(JsonNode::as_str), Some("first"));
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// First member named `key`, when this is an object
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        self.members()?
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Object members in document order, including repeated keys
    pub fn members(&self) -> Option<&[(String, JsonNode)]> {
        match self {
            JsonNode::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonNode]> {
        match self {
            JsonNode::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonNode::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonNode::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonNode::Object(_))
    }
}

impl fmt::Display for JsonNode {
    /// Compact JSON text
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for JsonNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            JsonNode::Null => serializer.serialize_unit(),
            JsonNode::Bool(b) => serializer.serialize_bool(*b),
            JsonNode::Number(n) => n.serialize(serializer),
            JsonNode::String(s) => serializer.serialize_str(s),
            JsonNode::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonNode::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (key, value) in members {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for JsonNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(JsonNodeVisitor)
    }
}

struct JsonNodeVisitor;

impl<'de> Visitor<'de> for JsonNodeVisitor {
    type Value = JsonNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<JsonNode, E> {
        Ok(JsonNode::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<JsonNode, E> {
        Ok(JsonNode::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<JsonNode, E> {
        Ok(JsonNode::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<JsonNode, E> {
        Ok(Number::from_f64(v).map_or(JsonNode::Null, JsonNode::Number))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<JsonNode, E> {
        Ok(JsonNode::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<JsonNode, E> {
        Ok(JsonNode::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsonNode, E> {
        Ok(JsonNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsonNode, E> {
        Ok(JsonNode::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<JsonNode, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonNode::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<JsonNode, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonNode::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<JsonNode, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, JsonNode>()? {
            members.push((key, value));
        }
        Ok(JsonNode::Object(members))
    }
}
