//! Cascading sub-location selector used by the movement forms
//!
//! The selector shows one drop-down per hierarchy level: the top-level nodes,
//! then the children of each node chosen so far.

use std::collections::HashSet;

use serde::Serialize;

use crate::tree::SubLocationTree;
use crate::types::{NodeRef, SubLocationId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    pub id: SubLocationId,
    pub name: String,
    /// Shown but not selectable (e.g. the origin of a transfer)
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorLevel {
    pub index: usize,
    pub selected: Option<SubLocationId>,
    pub options: Vec<SelectorOption>,
}

/// The chain of ids picked so far, root first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CascadingSelection {
    path: Vec<SubLocationId>,
}

impl CascadingSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild the chain leading to an externally chosen id.
    ///
    /// A cyclic hierarchy yields an empty chain.
    pub fn from_selected(tree: &SubLocationTree, selected: Option<SubLocationId>) -> Self {
        let path = match selected {
            None => Vec::new(),
            Some(id) => tree.path_ids(id).unwrap_or_else(|err| {
                tracing::warn!(node_id = %id, "{}; clearing selection", err);
                Vec::new()
            }),
        };
        Self { path }
    }

    pub fn path(&self) -> &[SubLocationId] {
        &self.path
    }

    /// The most specific id chosen, if any
    pub fn selected(&self) -> Option<SubLocationId> {
        self.path.last().copied()
    }

    /// Pick `value` at `level`, discarding deeper picks. `None` clears the
    /// level. Returns the new effective selection.
    pub fn choose(&mut self, level: usize, value: Option<SubLocationId>) -> Option<SubLocationId> {
        self.path.truncate(level);
        if let Some(id) = value {
            self.path.push(id);
        }
        self.selected()
    }

    /// Drop-downs to render: level 0 always, then one per chosen node that has
    /// active children.
    pub fn levels(
        &self,
        tree: &SubLocationTree,
        disabled: &HashSet<SubLocationId>,
    ) -> Vec<SelectorLevel> {
        let parents = std::iter::once(NodeRef::Root).chain(self.path.iter().map(|id| NodeRef::Node(*id)));

        let mut levels = Vec::new();
        for parent in parents {
            let options: Vec<SelectorOption> = tree
                .children_of(parent)
                .into_iter()
                .map(|n| SelectorOption {
                    id: n.id,
                    name: n.name.clone(),
                    disabled: disabled.contains(&n.id),
                })
                .collect();

            if !parent.is_root() && options.is_empty() {
                continue;
            }
            let index = levels.len();
            levels.push(SelectorLevel {
                index,
                selected: self.path.get(index).copied(),
                options,
            });
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubLocation;
    use crate::types::WarehouseId;

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

    fn tree() -> SubLocationTree {
        SubLocationTree::from_nodes(
            WarehouseId(1),
            vec![
                node(1, "Planta 1", None),
                node(2, "Pasillo 3", Some(1)),
                node(3, "Estante B", Some(2)),
                node(4, "Pasillo 1", Some(1)),
                node(5, "Patio", None),
            ],
        )
    }

    #[test]
    fn test_selection_rebuilt_from_leaf() {
        let selection = CascadingSelection::from_selected(&tree(), Some(SubLocationId(3)));
        assert_eq!(
            selection.path(),
            &[SubLocationId(1), SubLocationId(2), SubLocationId(3)]
        );
        assert_eq!(selection.selected(), Some(SubLocationId(3)));
    }

    #[test]
    fn test_levels_follow_the_chain() {
        let tree = tree();
        let selection = CascadingSelection::from_selected(&tree, Some(SubLocationId(3)));
        let levels = selection.levels(&tree, &HashSet::new());

        // Estante B has no children, so only three drop-downs
        assert_eq!(levels.len(), 3);
        let level1: Vec<&str> = levels[1].options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(level1, vec!["Pasillo 1", "Pasillo 3"]);
        assert_eq!(levels[1].selected, Some(SubLocationId(2)));
        assert_eq!(levels[2].selected, Some(SubLocationId(3)));
    }

    #[test]
    fn test_choose_truncates_deeper_levels() {
        let tree = tree();
        let mut selection = CascadingSelection::from_selected(&tree, Some(SubLocationId(3)));

        assert_eq!(selection.choose(1, Some(SubLocationId(4))), Some(SubLocationId(4)));
        assert_eq!(selection.path(), &[SubLocationId(1), SubLocationId(4)]);

        assert_eq!(selection.choose(0, None), None);
        assert!(selection.path().is_empty());
        assert_eq!(selection.levels(&tree, &HashSet::new()).len(), 1);
    }

    #[test]
    fn test_disabled_options_are_flagged() {
        let tree = tree();
        let disabled: HashSet<_> = [SubLocationId(5)].into_iter().collect();
        let levels = CascadingSelection::empty().levels(&tree, &disabled);

        let patio = levels[0].options.iter().find(|o| o.name == "Patio").unwrap();
        assert!(patio.disabled);
    }
}
