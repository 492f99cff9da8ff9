//! Basic value types exchanged with the graph store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One result row: column alias -> value.
///
/// Ordered so that rows render identically on every run.
pub type Row = BTreeMap<String, DataPacket>;

/// Bound parameters for a graph query.
pub type QueryParams = BTreeMap<String, DataPacket>;

/// Generic data packet for values flowing in and out of the graph store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataPacket {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Array(Vec<DataPacket>),
    Object(BTreeMap<String, DataPacket>),
    Json(serde_json::Value),
}

impl DataPacket {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataPacket::String(s) => Some(s),
            DataPacket::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataPacket::Number(n) => Some(*n),
            DataPacket::Integer(i) => Some(*i as f64),
            DataPacket::Json(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataPacket::Integer(i) => Some(*i),
            DataPacket::Json(serde_json::Value::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<DataPacket>> {
        match self {
            DataPacket::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, DataPacket>> {
        match self {
            DataPacket::Object(obj) => Some(obj),
            _ => None,
        }
    }

    // Helper to convert DataPacket to Json
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DataPacket::Null => serde_json::Value::Null,
            DataPacket::Bool(b) => serde_json::Value::Bool(*b),
            DataPacket::Integer(i) => serde_json::json!(i),
            DataPacket::Number(n) => serde_json::json!(n),
            DataPacket::String(s) => serde_json::Value::String(s.clone()),
            DataPacket::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|item| item.to_json()).collect())
            }
            DataPacket::Object(obj) => {
                let mut json_obj = serde_json::Map::new();
                for (k, v) in obj {
                    json_obj.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(json_obj)
            }
            DataPacket::Json(j) => j.clone(),
        }
    }

    /// Converts a JSON value into the most specific packet variant.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DataPacket::Null,
            serde_json::Value::Bool(b) => DataPacket::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => DataPacket::Integer(i),
                None => DataPacket::Number(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => DataPacket::String(s),
            serde_json::Value::Array(arr) => {
                DataPacket::Array(arr.into_iter().map(DataPacket::from_json).collect())
            }
            serde_json::Value::Object(obj) => DataPacket::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, DataPacket::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for DataPacket {
    fn from(s: &str) -> Self {
        DataPacket::String(s.to_string())
    }
}

impl From<String> for DataPacket {
    fn from(s: String) -> Self {
        DataPacket::String(s)
    }
}

impl From<i64> for DataPacket {
    fn from(i: i64) -> Self {
        DataPacket::Integer(i)
    }
}

impl From<f64> for DataPacket {
    fn from(n: f64) -> Self {
        DataPacket::Number(n)
    }
}

impl From<bool> for DataPacket {
    fn from(b: bool) -> Self {
        DataPacket::Bool(b)
    }
}

impl From<serde_json::Value> for DataPacket {
    fn from(v: serde_json::Value) -> Self {
        DataPacket::Json(v)
    }
}

impl From<DataPacket> for serde_json::Value {
    fn from(packet: DataPacket) -> Self {
        packet.to_json()
    }
}
