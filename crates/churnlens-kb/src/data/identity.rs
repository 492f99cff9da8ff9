//! Node identity resolution.
//!
//! A node is addressed by its `id` property, falling back to `name`. Stores
//! hand nodes back either as property maps or as already-projected records;
//! both resolve through [`NodeIdentity`].

use std::collections::BTreeMap;

use crate::data::types::DataPacket;

/// Anything that can name a graph node.
pub trait NodeIdentity {
    /// Returns the node's id, else its name, else `""`.
    ///
    /// The empty string is never a valid identity and callers filter it out.
    fn resolve_identity(&self) -> String;
}

/// A node value as returned in a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRef {
    /// Property map of a graph node.
    Mapping(BTreeMap<String, DataPacket>),
    /// Projected id/name pair.
    Record {
        id: Option<String>,
        name: Option<String>,
    },
}

impl NodeRef {
    /// Reads a node out of a row cell. Returns `None` for null or scalar cells
    /// that are not strings.
    pub fn from_packet(packet: &DataPacket) -> Option<Self> {
        match packet {
            DataPacket::Object(map) => Some(NodeRef::Mapping(map.clone())),
            DataPacket::Json(serde_json::Value::Object(obj)) => Some(NodeRef::Mapping(
                obj.iter()
                    .map(|(k, v)| (k.clone(), DataPacket::from_json(v.clone())))
                    .collect(),
            )),
            DataPacket::String(s) => Some(NodeRef::Record {
                id: Some(s.clone()),
                name: None,
            }),
            _ => None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl NodeIdentity for NodeRef {
    fn resolve_identity(&self) -> String {
        let resolved = match self {
            NodeRef::Mapping(props) => non_empty(props.get("id").and_then(DataPacket::as_str))
                .or_else(|| non_empty(props.get("name").and_then(DataPacket::as_str))),
            NodeRef::Record { id, name } => {
                non_empty(id.as_deref()).or_else(|| non_empty(name.as_deref()))
            }
        };
        resolved.unwrap_or_default().to_string()
    }
}

impl NodeIdentity for DataPacket {
    fn resolve_identity(&self) -> String {
        NodeRef::from_packet(self)
            .map(|node| node.resolve_identity())
            .unwrap_or_default()
    }
}
