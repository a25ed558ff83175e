//! Node identifiers

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Identifier of a tree node: a JSON number, a string, or null.
///
/// Numbers keep their exact JSON value, so `1` and `1.0` are different ids.
///
/// `Null` belongs to the synthetic root only. Every other value, including
/// `0` and the empty string, is an ordinary identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    #[default]
    Null,
    Number(Number),
    Text(String),
}

impl NodeId {
    pub fn is_null(&self) -> bool {
        matches!(self, NodeId::Null)
    }

    /// Reads user input: `null` is the root id, JSON numbers become `Number`,
    /// anything else is `Text`.
    pub fn from_input(s: &str) -> Self {
        if s == "null" {
            return NodeId::Null;
        }
        s.parse::<Number>()
            .map(NodeId::Number)
            .unwrap_or_else(|_| NodeId::Text(s.to_string()))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Null => write!(f, "null"),
            NodeId::Number(n) => write!(f, "{}", n),
            NodeId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for NodeId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_input(s))
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Number(n.into())
    }
}

impl From<Number> for NodeId {
    fn from(n: Number) -> Self {
        NodeId::Number(n)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Text(s)
    }
}
