//! Serialized shapes of nodes: flat records and nested tree arrays.
//!
//! The structural `id` and `children` keys are consumed by these structs;
//! every other key flattens into the caller's payload type.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::domain::node_id::NodeId;

/// Default payload: an arbitrary JSON object.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Identifier plus payload fields, as produced by an editor form or a drop.
///
/// A `children` key is read and thrown away: a record always becomes a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T = Payload> {
    pub id: NodeId,
    #[serde(flatten)]
    pub data: T,
    #[serde(default, skip_serializing)]
    children: IgnoredAny,
}

impl<T> Record<T> {
    pub fn new(id: impl Into<NodeId>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            children: IgnoredAny,
        }
    }
}

/// One element of the nested-array representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct TreeRecord<T = Payload> {
    pub id: NodeId,
    #[serde(flatten)]
    pub data: T,
    #[serde(default)]
    pub children: Vec<TreeRecord<T>>,
}

impl<T> TreeRecord<T> {
    pub fn new(id: impl Into<NodeId>, data: T, children: Vec<TreeRecord<T>>) -> Self {
        Self {
            id: id.into(),
            data,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structural_keys_do_not_leak_into_payload() {
        let rec: TreeRecord = serde_json::from_value(json!({
            "id": 1,
            "name": "beds",
            "children": [{"id": 4, "name": "pelechy"}]
        }))
        .unwrap();

        assert_eq!(rec.id, NodeId::from(1));
        assert_eq!(rec.data.len(), 1);
        assert_eq!(rec.data["name"], json!("beds"));
        assert!(!rec.data.contains_key("children"));
        assert_eq!(rec.children.len(), 1);
        assert!(rec.children[0].children.is_empty());
    }

    #[test]
    fn test_record_discards_children_key() {
        let rec: Record = serde_json::from_value(json!({
            "id": 1,
            "name": "beds",
            "children": [{"id": 4, "children": []}]
        }))
        .unwrap();

        assert!(!rec.data.contains_key("children"));
        assert_eq!(rec.data.len(), 1);
        assert_eq!(rec, Record::new(1, rec.data.clone()));
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({"id": 1, "name": "beds"})
        );
    }

    #[test]
    fn test_serialized_record_always_carries_children() {
        let rec = TreeRecord::new(2, Payload::new(), vec![]);
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({"id": 2, "children": []})
        );
    }

    #[test]
    fn test_typed_payload() {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Item {
            name: String,
        }

        let rec: Record<Item> = serde_json::from_str(r#"{"id":"a","name":"toys"}"#).unwrap();
        assert_eq!(rec, Record::new("a", Item { name: "toys".into() }));
    }

    #[test]
    fn test_tree_record_payload_needs_no_default() {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Item {
            name: String,
        }

        let recs: Vec<TreeRecord<Item>> =
            serde_json::from_str(r#"[{"id":1,"name":"beds","children":[{"id":4,"name":"pelechy"}]}]"#).unwrap();
        assert_eq!(recs[0].data, Item { name: "beds".into() });
        assert_eq!(recs[0].children[0].data, Item { name: "pelechy".into() });
    }
}
