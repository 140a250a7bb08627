//! Root-to-node path resolution over parent links

use std::collections::{HashMap, HashSet};

use crate::error::CyclicHierarchyError;
use crate::models::SubLocation;
use crate::types::SubLocationId;

/// Walk parent links from `target` up to its top-level ancestor.
///
/// `parent_of` returns `None` for an unknown node and `Some(parent)` for a known
/// one. The walk stops at a top-level node or at the first unknown id, so an
/// unknown `target` yields an empty path. Returns ids ordered root first,
/// `target` last.
pub fn resolve_path<F>(
    target: Option<SubLocationId>,
    parent_of: F,
) -> Result<Vec<SubLocationId>, CyclicHierarchyError>
where
    F: Fn(SubLocationId) -> Option<Option<SubLocationId>>,
{
    let mut path = Vec::new();
    let mut visited = HashSet::new();
    let mut cursor = target;

    while let Some(id) = cursor {
        let Some(parent) = parent_of(id) else {
            break;
        };
        if !visited.insert(id) {
            return Err(CyclicHierarchyError { node: id });
        }
        path.push(id);
        cursor = parent;
    }

    path.reverse();
    Ok(path)
}

/// [`resolve_path`] over a flat list of nodes
pub fn resolve_path_in(
    target: Option<SubLocationId>,
    nodes: &[SubLocation],
) -> Result<Vec<SubLocationId>, CyclicHierarchyError> {
    let parents: HashMap<SubLocationId, Option<SubLocationId>> =
        nodes.iter().map(|n| (n.id, n.parent)).collect();
    resolve_path(target, |id| parents.get(&id).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WarehouseId;

    fn node(id: i64, parent: Option<i64>) -> SubLocation {
        SubLocation {
            id: SubLocationId(id),
            name: format!("N{}", id),
            warehouse_id: WarehouseId(1),
            parent: parent.map(SubLocationId),
            active: true,
            full_path: None,
        }
    }

    fn ids(raw: &[i64]) -> Vec<SubLocationId> {
        raw.iter().copied().map(SubLocationId).collect()
    }

    #[test]
    fn test_absent_target_gives_empty_path() {
        let nodes = vec![node(1, None)];
        assert!(resolve_path_in(None, &nodes).unwrap().is_empty());
    }

    #[test]
    fn test_path_is_root_first() {
        let nodes = vec![node(1, None), node(2, Some(1)), node(3, Some(2))];
        assert_eq!(
            resolve_path_in(Some(SubLocationId(3)), &nodes).unwrap(),
            ids(&[1, 2, 3])
        );
        assert_eq!(
            resolve_path_in(Some(SubLocationId(1)), &nodes).unwrap(),
            ids(&[1])
        );
    }

    #[test]
    fn test_unknown_nodes_stop_the_walk() {
        // 2's parent 99 is not loaded
        let nodes = vec![node(2, Some(99)), node(3, Some(2))];
        assert_eq!(
            resolve_path_in(Some(SubLocationId(3)), &nodes).unwrap(),
            ids(&[2, 3])
        );
        assert!(resolve_path_in(Some(SubLocationId(42)), &nodes)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_cycles_are_detected() {
        let nodes = vec![node(1, Some(3)), node(2, Some(1)), node(3, Some(2))];
        let err = resolve_path_in(Some(SubLocationId(2)), &nodes).unwrap_err();
        assert_eq!(err, CyclicHierarchyError { node: SubLocationId(2) });

        let self_loop = vec![node(5, Some(5))];
        assert!(resolve_path_in(Some(SubLocationId(5)), &self_loop).is_err());
    }
}
