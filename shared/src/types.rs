//! Common types used across the console

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a warehouse (bodega)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseId(pub i64);

/// Identifier of a sub-location (subbodega)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubLocationId(pub i64);

/// Identifier of a catalog material
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub i64);

impl fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SubLocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A position in a warehouse hierarchy: the warehouse root or one sub-location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NodeRef {
    #[default]
    Root,
    Node(SubLocationId),
}

impl NodeRef {
    /// The sub-location id, or `None` at the root
    pub fn id(&self) -> Option<SubLocationId> {
        match self {
            NodeRef::Root => None,
            NodeRef::Node(id) => Some(*id),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, NodeRef::Root)
    }
}

impl From<Option<SubLocationId>> for NodeRef {
    fn from(id: Option<SubLocationId>) -> Self {
        id.map_or(NodeRef::Root, NodeRef::Node)
    }
}

impl From<SubLocationId> for NodeRef {
    fn from(id: SubLocationId) -> Self {
        NodeRef::Node(id)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Root => write!(f, "root"),
            NodeRef::Node(id) => write!(f, "sub-location {}", id),
        }
    }
}

/// Paginated list envelope returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// List endpoints answer either with a bare array or with a [`Page`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated(Page<T>),
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Split into the items of this page and the link to the next one
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        match self {
            ListResponse::Paginated(page) => (page.results, page.next.filter(|n| !n.is_empty())),
            ListResponse::Plain(items) => (items, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ref_from_option() {
        assert_eq!(NodeRef::from(None), NodeRef::Root);
        assert_eq!(
            NodeRef::from(Some(SubLocationId(4))),
            NodeRef::Node(SubLocationId(4))
        );
        assert_eq!(NodeRef::Node(SubLocationId(4)).id(), Some(SubLocationId(4)));
        assert!(NodeRef::Root.is_root());
    }

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let plain: ListResponse<i64> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(plain.into_parts(), (vec![1, 2, 3], None));

        let paginated: ListResponse<i64> = serde_json::from_str(
            r#"{"count": 3, "next": "http://api/x/?page=2", "previous": null, "results": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(
            paginated.into_parts(),
            (vec![1, 2], Some("http://api/x/?page=2".to_string()))
        );
    }
}
