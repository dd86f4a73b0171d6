//! Assembly of adjacency-list rows (departments, menus) into nested trees.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::entities::{DepartmentRecord, MenuRecord};

/// A row that points at its parent through a nullable id.
pub trait Hierarchical {
    fn node_id(&self) -> Uuid;
    fn parent_id(&self) -> Option<Uuid>;
    fn sort_order(&self) -> i32;
    fn created_at(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub node: T,
    pub children: Vec<TreeNode<T>>,
}

/// Build a forest from a flat list.
///
/// Siblings are ordered by `sort_order`, then `created_at`, then id. Rows whose
/// parent is absent from `items` (deleted or never existed) become roots, as do
/// rows that name themselves as parent. Rows caught in a parent cycle are
/// attached under the first cycle member in sibling order, which is promoted
/// to a root; every row appears exactly once.
pub fn build_tree<T: Hierarchical>(items: Vec<T>) -> Vec<TreeNode<T>> {
    let known: HashSet<Uuid> = items.iter().map(Hierarchical::node_id).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<Uuid, Vec<T>> = HashMap::new();
    for item in items {
        match item.parent_id() {
            Some(parent) if parent != item.node_id() && known.contains(&parent) => {
                children.entry(parent).or_default().push(item);
            }
            _ => roots.push(item),
        }
    }

    let mut forest = attach(roots, &mut children);

    while !children.is_empty() {
        let mut leftovers: Vec<T> = children.drain().flat_map(|(_, group)| group).collect();
        sort_siblings(&mut leftovers);
        let head = leftovers.remove(0);
        for item in leftovers {
            match item.parent_id() {
                Some(parent) => children.entry(parent).or_default().push(item),
                None => forest.extend(attach(vec![item], &mut HashMap::new())),
            }
        }
        forest.extend(attach(vec![head], &mut children));
    }

    forest
}

fn attach<T: Hierarchical>(
    mut nodes: Vec<T>,
    children: &mut HashMap<Uuid, Vec<T>>,
) -> Vec<TreeNode<T>> {
    sort_siblings(&mut nodes);
    let mut assembled = Vec::with_capacity(nodes.len());
    for node in nodes {
        let direct = children.remove(&node.node_id()).unwrap_or_default();
        let nested = attach(direct, children);
        assembled.push(TreeNode {
            node,
            children: nested,
        });
    }
    assembled
}

fn sort_siblings<T: Hierarchical>(nodes: &mut [T]) {
    nodes.sort_by(|a, b| {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.created_at().cmp(&b.created_at()))
            .then_with(|| a.node_id().cmp(&b.node_id()))
    });
}

impl Hierarchical for DepartmentRecord {
    fn node_id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Hierarchical for MenuRecord {
    fn node_id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        id: Uuid,
        parent: Option<Uuid>,
        order: i32,
        at: OffsetDateTime,
    }

    impl Hierarchical for Node {
        fn node_id(&self) -> Uuid {
            self.id
        }

        fn parent_id(&self) -> Option<Uuid> {
            self.parent
        }

        fn sort_order(&self) -> i32 {
            self.order
        }

        fn created_at(&self) -> OffsetDateTime {
            self.at
        }
    }

    fn node(parent: Option<Uuid>, order: i32, offset_secs: i64) -> Node {
        Node {
            id: Uuid::new_v4(),
            parent,
            order,
            at: OffsetDateTime::UNIX_EPOCH + Duration::seconds(offset_secs),
        }
    }

    fn ids<T: Hierarchical>(nodes: &[TreeNode<T>]) -> Vec<Uuid> {
        nodes.iter().map(|n| n.node.node_id()).collect()
    }

    fn count<T>(nodes: &[TreeNode<T>]) -> usize {
        nodes.iter().map(|n| 1 + count(&n.children)).sum()
    }

    #[test]
    fn nests_children_under_parents_in_sort_order() {
        let root = node(None, 0, 0);
        let second = node(Some(root.id), 2, 1);
        let first = node(Some(root.id), 1, 2);
        let grandchild = node(Some(first.id), 0, 3);

        let tree = build_tree(vec![grandchild.clone(), second.clone(), root.clone(), first.clone()]);

        assert_eq!(ids(&tree), vec![root.id]);
        assert_eq!(ids(&tree[0].children), vec![first.id, second.id]);
        assert_eq!(ids(&tree[0].children[0].children), vec![grandchild.id]);
    }

    #[test]
    fn equal_sort_order_falls_back_to_creation_time() {
        let later = node(None, 0, 10);
        let earlier = node(None, 0, 5);

        let tree = build_tree(vec![later.clone(), earlier.clone()]);

        assert_eq!(ids(&tree), vec![earlier.id, later.id]);
    }

    #[test]
    fn orphans_and_self_parents_become_roots() {
        let orphan = node(Some(Uuid::new_v4()), 0, 0);
        let mut selfish = node(None, 1, 1);
        selfish.parent = Some(selfish.id);

        let tree = build_tree(vec![orphan.clone(), selfish.clone()]);

        assert_eq!(ids(&tree), vec![orphan.id, selfish.id]);
    }

    #[test]
    fn parent_cycles_keep_every_row_once() {
        let mut a = node(None, 0, 0);
        let mut b = node(None, 1, 1);
        a.parent = Some(b.id);
        b.parent = Some(a.id);
        let leaf = node(Some(b.id), 0, 2);

        let tree = build_tree(vec![a.clone(), b.clone(), leaf.clone()]);

        assert_eq!(count(&tree), 3);
        assert_eq!(ids(&tree), vec![a.id]);
        assert_eq!(ids(&tree[0].children), vec![b.id]);
        assert_eq!(ids(&tree[0].children[0].children), vec![leaf.id]);
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        let tree: Vec<TreeNode<Node>> = build_tree(Vec::new());
        assert!(tree.is_empty());
    }
}
