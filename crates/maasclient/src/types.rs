//! Read-only helpers over MAAS node and tag JSON
//!
//! Nodes and tags stay opaque `serde_json::Value`s; these accessors pull out
//! the handful of fields the client and CLI care about.

use serde_json::Value;
use std::fmt;

/// Tag that selects the fast path installer for a node
pub const FPI_TAG: &str = "use-fastpath-installer";

pub fn system_id(node: &Value) -> Option<&str> {
    node.get("system_id").and_then(Value::as_str)
}

pub fn hostname(node: &Value) -> Option<&str> {
    node.get("hostname").and_then(Value::as_str)
}

/// Tags already applied to a node (empty when the field is absent)
pub fn tag_names(node: &Value) -> Vec<&str> {
    node.get("tag_names")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

pub fn has_tag(node: &Value, tag: &str) -> bool {
    tag_names(node).contains(&tag)
}

pub fn mac_addresses(node: &Value) -> Vec<&str> {
    node.get("macaddress_set")
        .and_then(Value::as_array)
        .map(|macs| {
            macs.iter()
                .filter_map(|m| m.get("mac_address").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Name field of a tag object
pub fn tag_name_of(tag: &Value) -> Option<&str> {
    tag.get("name").and_then(Value::as_str)
}

/// MAAS 1.x node status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    New,
    Commissioning,
    FailedTests,
    Missing,
    Ready,
    Reserved,
    Deployed,
    Retired,
    Broken,
    Unknown(i64),
}

impl NodeStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::New,
            1 => Self::Commissioning,
            2 => Self::FailedTests,
            3 => Self::Missing,
            4 => Self::Ready,
            5 => Self::Reserved,
            6 => Self::Deployed,
            7 => Self::Retired,
            8 => Self::Broken,
            other => Self::Unknown(other),
        }
    }

    /// Status of a node object, if it carries a numeric `status`
    pub fn of(node: &Value) -> Option<Self> {
        node.get("status").and_then(Value::as_i64).map(Self::from_code)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Commissioning => write!(f, "Commissioning"),
            Self::FailedTests => write!(f, "Failed tests"),
            Self::Missing => write!(f, "Missing"),
            Self::Ready => write!(f, "Ready"),
            Self::Reserved => write!(f, "Reserved"),
            Self::Deployed => write!(f, "Deployed"),
            Self::Retired => write!(f, "Retired"),
            Self::Broken => write!(f, "Broken"),
            Self::Unknown(code) => write!(f, "Unknown ({})", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_accessors() {
        let node = json!({
            "system_id": "node-01",
            "hostname": "m6mm9.maas",
            "status": 4,
            "tag_names": ["gpu", FPI_TAG],
            "macaddress_set": [{"mac_address": "ec:a8:6b:fb:34:d6"}]
        });

        assert_eq!(system_id(&node), Some("node-01"));
        assert_eq!(hostname(&node), Some("m6mm9.maas"));
        assert!(has_tag(&node, FPI_TAG));
        assert!(!has_tag(&node, "node-01"));
        assert_eq!(mac_addresses(&node), vec!["ec:a8:6b:fb:34:d6"]);
        assert_eq!(NodeStatus::of(&node), Some(NodeStatus::Ready));
    }

    #[test]
    fn test_missing_fields() {
        let node = json!({});
        assert!(system_id(&node).is_none());
        assert!(tag_names(&node).is_empty());
        assert!(mac_addresses(&node).is_empty());
        assert!(NodeStatus::of(&node).is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(NodeStatus::from_code(2).to_string(), "Failed tests");
        assert_eq!(NodeStatus::from_code(42).to_string(), "Unknown (42)");
    }
}
