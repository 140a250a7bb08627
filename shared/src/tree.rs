//! Per-warehouse sub-location tree
//!
//! Nodes are kept in an id-keyed arena; parent links are plain ids and every
//! traversal goes through [`resolve_path`], so a malformed hierarchy can never
//! send a lookup into an endless loop.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CyclicHierarchyError;
use crate::models::{SubLocation, PATH_SEPARATOR};
use crate::path::resolve_path;
use crate::types::{NodeRef, SubLocationId, WarehouseId};

/// Ordering applied to a level's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildOrder {
    /// Case-insensitive name, ascending
    #[default]
    NameAscending,
    NameDescending,
    /// Identifier order, roughly creation order
    Id,
}

/// Which children of a level are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChildFilter {
    pub include_inactive: bool,
    pub order: ChildOrder,
}

impl ChildFilter {
    pub fn including_inactive() -> Self {
        Self {
            include_inactive: true,
            ..Self::default()
        }
    }
}

/// Sort a level listing the way [`SubLocationTree::children_with`] does
pub fn sort_nodes<T: Borrow<SubLocation>>(nodes: &mut [T], order: ChildOrder) {
    match order {
        ChildOrder::NameAscending => {
            nodes.sort_by_cached_key(|n| (n.borrow().name.to_lowercase(), n.borrow().id));
        }
        ChildOrder::NameDescending => {
            nodes.sort_by_cached_key(|n| (n.borrow().name.to_lowercase(), n.borrow().id));
            nodes.reverse();
        }
        ChildOrder::Id => nodes.sort_by_key(|n| n.borrow().id),
    }
}

/// All known sub-locations of one warehouse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubLocationTree {
    warehouse_id: WarehouseId,
    nodes: BTreeMap<SubLocationId, SubLocation>,
}

impl SubLocationTree {
    pub fn new(warehouse_id: WarehouseId) -> Self {
        Self {
            warehouse_id,
            nodes: BTreeMap::new(),
        }
    }

    pub fn from_nodes(
        warehouse_id: WarehouseId,
        nodes: impl IntoIterator<Item = SubLocation>,
    ) -> Self {
        let mut tree = Self::new(warehouse_id);
        tree.extend(nodes);
        tree
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: SubLocationId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: SubLocationId) -> Option<&SubLocation> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SubLocation> {
        self.nodes.values()
    }

    /// Insert or replace a node, returning the previous version
    pub fn upsert(&mut self, node: SubLocation) -> Option<SubLocation> {
        self.nodes.insert(node.id, node)
    }

    pub fn extend(&mut self, nodes: impl IntoIterator<Item = SubLocation>) {
        for node in nodes {
            self.upsert(node);
        }
    }

    /// Active children of `parent` in name order
    pub fn children_of(&self, parent: NodeRef) -> Vec<&SubLocation> {
        self.children_with(parent, ChildFilter::default())
    }

    /// Children of `parent` belonging to this warehouse.
    ///
    /// A parent id that is not in the tree has no children; stale ids are
    /// expected while a refetch is pending.
    pub fn children_with(&self, parent: NodeRef, filter: ChildFilter) -> Vec<&SubLocation> {
        if let NodeRef::Node(id) = parent {
            if !self.contains(id) {
                return Vec::new();
            }
        }

        let parent_id = parent.id();
        let mut children: Vec<&SubLocation> = self
            .nodes
            .values()
            .filter(|n| n.warehouse_id == self.warehouse_id)
            .filter(|n| n.parent == parent_id)
            .filter(|n| filter.include_inactive || n.active)
            .collect();

        sort_nodes(&mut children, filter.order);
        children
    }

    /// Ids from the top-level ancestor down to `id` inclusive
    pub fn path_ids(&self, id: SubLocationId) -> Result<Vec<SubLocationId>, CyclicHierarchyError> {
        resolve_path(Some(id), |n| self.nodes.get(&n).map(|node| node.parent))
    }

    /// Nodes from the top-level ancestor down to `id` inclusive
    pub fn path_nodes(&self, id: SubLocationId) -> Result<Vec<&SubLocation>, CyclicHierarchyError> {
        Ok(self
            .path_ids(id)?
            .into_iter()
            .filter_map(|n| self.nodes.get(&n))
            .collect())
    }

    /// Ancestors of `node`, root first, excluding `node` itself
    pub fn ancestors(&self, node: &SubLocation) -> Result<Vec<&SubLocation>, CyclicHierarchyError> {
        let ids = resolve_path(node.parent, |n| self.nodes.get(&n).map(|p| p.parent))?;
        if ids.contains(&node.id) {
            return Err(CyclicHierarchyError { node: node.id });
        }
        Ok(ids.into_iter().filter_map(|n| self.nodes.get(&n)).collect())
    }

    /// Human-readable path such as `"Planta 1 > Pasillo 3 > Estante B"`.
    ///
    /// Uses the server-computed path when present. A cyclic chain is logged
    /// and the node is rendered as if it were top-level.
    pub fn display_path(&self, node: &SubLocation) -> String {
        if let Some(path) = node.precomputed_path() {
            return path.to_string();
        }

        match self.ancestors(node) {
            Ok(ancestors) => ancestors
                .iter()
                .map(|a| a.name.as_str())
                .chain(std::iter::once(node.name.as_str()))
                .collect::<Vec<_>>()
                .join(PATH_SEPARATOR),
            Err(err) => {
                tracing::warn!(
                    warehouse_id = %self.warehouse_id,
                    node_id = %node.id,
                    "{}; rendering node as top-level",
                    err
                );
                node.name.clone()
            }
        }
    }

    /// [`Self::display_path`] for a node looked up by id
    pub fn display_path_of(&self, id: SubLocationId) -> Option<String> {
        self.get(id).map(|node| self.display_path(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, name: &str, parent: Option<i64>) -> SubLocation {
        SubLocation {
            id: SubLocationId(id),
            name: name.to_string(),
            warehouse_id: WarehouseId(1),
            parent: parent.map(SubLocationId),
            active: true,
            full_path: None,
        }
    }

    fn sample_tree() -> SubLocationTree {
        let mut inactive = node(4, "Antiguo", None);
        inactive.active = false;
        let mut foreign = node(5, "Otra bodega", None);
        foreign.warehouse_id = WarehouseId(2);

        SubLocationTree::from_nodes(
            WarehouseId(1),
            vec![
                node(1, "planta 1", None),
                node(2, "Pasillo 3", Some(1)),
                node(3, "Estante B", Some(2)),
                inactive,
                foreign,
                node(6, "Bodega fría", None),
            ],
        )
    }

    fn names(nodes: &[&SubLocation]) -> Vec<String> {
        nodes.iter().map(|n| n.name.clone()).collect()
    }

    #[test]
    fn test_root_children_are_active_local_and_sorted() {
        let tree = sample_tree();
        assert_eq!(
            names(&tree.children_of(NodeRef::Root)),
            vec!["Bodega fría", "planta 1"]
        );
    }

    #[test]
    fn test_children_filter_and_order_can_be_overridden() {
        let tree = sample_tree();
        let all = tree.children_with(NodeRef::Root, ChildFilter::including_inactive());
        assert_eq!(names(&all), vec!["Antiguo", "Bodega fría", "planta 1"]);

        let by_id = tree.children_with(
            NodeRef::Root,
            ChildFilter {
                include_inactive: false,
                order: ChildOrder::Id,
            },
        );
        assert_eq!(names(&by_id), vec!["planta 1", "Bodega fría"]);
    }

    #[test]
    fn test_unknown_parent_has_no_children() {
        let mut tree = sample_tree();
        tree.upsert(node(9, "Huérfano", Some(77)));
        assert!(tree.children_of(NodeRef::Node(SubLocationId(77))).is_empty());
    }

    #[test]
    fn test_display_path_reconstructs_from_ancestors() {
        let tree = sample_tree();
        assert_eq!(
            tree.display_path_of(SubLocationId(3)).as_deref(),
            Some("planta 1 > Pasillo 3 > Estante B")
        );
        assert_eq!(tree.display_path_of(SubLocationId(42)), None);
    }

    #[test]
    fn test_display_path_prefers_precomputed_path() {
        let mut tree = sample_tree();
        let mut shelf = node(3, "Estante B", Some(2));
        shelf.full_path = Some("Planta Uno > Pasillo 3 > Estante B".to_string());
        tree.upsert(shelf.clone());

        assert_eq!(tree.display_path(&shelf), "Planta Uno > Pasillo 3 > Estante B");
    }

    #[test]
    fn test_display_path_of_cyclic_node_falls_back_to_name() {
        let tree = SubLocationTree::from_nodes(
            WarehouseId(1),
            vec![node(1, "A", Some(2)), node(2, "B", Some(1))],
        );
        assert_eq!(tree.display_path_of(SubLocationId(1)).as_deref(), Some("A"));
        assert!(tree.path_ids(SubLocationId(1)).is_err());
    }

    #[test]
    fn test_path_nodes() {
        let tree = sample_tree();
        let path = tree.path_nodes(SubLocationId(3)).unwrap();
        assert_eq!(names(&path), vec!["planta 1", "Pasillo 3", "Estante B"]);
    }
}
