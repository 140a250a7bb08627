//! Breadcrumb navigation state
//!
//! The state is a value: every transition returns a new [`NavigationState`]
//! that replaces the previous one.

use serde::Serialize;

use crate::models::SubLocation;
use crate::types::NodeRef;

/// Where the user is inside a warehouse, with the path that led there
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NavigationState {
    /// Root-to-current path; empty at the warehouse root
    breadcrumbs: Vec<SubLocation>,
}

impl NavigationState {
    pub fn root() -> Self {
        Self::default()
    }

    /// State for an already-resolved root-to-node path
    pub fn from_path(path: Vec<SubLocation>) -> Self {
        Self { breadcrumbs: path }
    }

    pub fn current(&self) -> NodeRef {
        NodeRef::from(self.breadcrumbs.last().map(|n| n.id))
    }

    pub fn current_node(&self) -> Option<&SubLocation> {
        self.breadcrumbs.last()
    }

    pub fn breadcrumbs(&self) -> &[SubLocation] {
        &self.breadcrumbs
    }

    pub fn is_root(&self) -> bool {
        self.breadcrumbs.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.breadcrumbs.len()
    }

    pub fn to_root(&self) -> Self {
        Self::root()
    }

    /// Move to `node`.
    ///
    /// A node already on the breadcrumb trail truncates the trail there, so
    /// clicking an ancestor crumb never duplicates it; any other node is
    /// appended.
    pub fn to_node(&self, node: SubLocation) -> Self {
        let mut breadcrumbs = self.breadcrumbs.clone();
        match breadcrumbs.iter().position(|n| n.id == node.id) {
            Some(at) => {
                breadcrumbs.truncate(at + 1);
                // keep the freshest copy (it may have been renamed)
                breadcrumbs[at] = node;
            }
            None => breadcrumbs.push(node),
        }
        Self { breadcrumbs }
    }

    /// Replace a breadcrumb with a fresher copy of the same node
    pub fn refreshed(&self, node: &SubLocation) -> Self {
        let breadcrumbs = self
            .breadcrumbs
            .iter()
            .map(|n| if n.id == node.id { node.clone() } else { n.clone() })
            .collect();
        Self { breadcrumbs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SubLocationId, WarehouseId};

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

    fn trail(state: &NavigationState) -> Vec<&str> {
        state.breadcrumbs().iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_initial_state_is_root() {
        let state = NavigationState::root();
        assert_eq!(state.current(), NodeRef::Root);
        assert!(state.is_root());
        assert!(state.current_node().is_none());
    }

    #[test]
    fn test_descending_appends_breadcrumbs() {
        let state = NavigationState::root()
            .to_node(node(1, "A", None))
            .to_node(node(2, "B", Some(1)));

        assert_eq!(trail(&state), vec!["A", "B"]);
        assert_eq!(state.current(), NodeRef::Node(SubLocationId(2)));
        assert_eq!(state.current_node().map(|n| n.id), Some(SubLocationId(2)));
    }

    #[test]
    fn test_ancestor_crumb_truncates() {
        let state = NavigationState::root()
            .to_node(node(1, "A", None))
            .to_node(node(2, "B", Some(1)))
            .to_node(node(3, "C", Some(2)));

        let back = state.to_node(node(2, "B", Some(1)));
        assert_eq!(trail(&back), vec!["A", "B"]);
        assert_eq!(back.current(), NodeRef::Node(SubLocationId(2)));
    }

    #[test]
    fn test_current_crumb_is_a_no_op() {
        let state = NavigationState::root().to_node(node(1, "A", None));
        assert_eq!(state.to_node(node(1, "A", None)), state);
    }

    #[test]
    fn test_root_twice_equals_once() {
        let state = NavigationState::root().to_node(node(1, "A", None));
        let once = state.to_root();
        let twice = once.to_root();
        assert_eq!(once, twice);
        assert!(twice.breadcrumbs().is_empty());
    }

    #[test]
    fn test_refreshed_renames_crumb() {
        let state = NavigationState::root()
            .to_node(node(1, "A", None))
            .to_node(node(2, "B", Some(1)));
        let renamed = state.refreshed(&node(1, "A2", None));
        assert_eq!(trail(&renamed), vec!["A2", "B"]);
    }
}
