//! Serialized tree documents exchanged with the extraction stage and with
//! downstream consumers.
//!
//! ```json
//! {
//!   "graph": { "patient": "3" },
//!   "nodes": [ { "id": "0", "x": 0.0, "y": 0.0, "z": 0.0, "group_size": 40 } ],
//!   "edges": [ { "source": "0", "target": "1" } ]
//! }
//! ```
//!
//! Attributes not named here are carried through unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub graph: Map<String, Value>,
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Physical diameter proxy from extraction.
    pub group_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub source: String,
    #[serde(deserialize_with = "string_or_number")]
    pub target: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Node ids are strings, but extraction tools sometimes emit integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or integer id, found {other}"
        ))),
    }
}
