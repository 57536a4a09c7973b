//! Parent-linked forest construction shared by hierarchy and treemap views.
//!
//! Rows name their own id and an optional parent id. Linking follows the
//! orphan-promotion rule: a blank parent, a self-reference, or a parent that
//! is not present in the data makes the row a root. Parent cycles would leave
//! nodes unreachable from any root; the first such node in input order is
//! promoted to a root and the visited guard stops the walk at the back edge,
//! so the result is always a finite tree.

use std::collections::HashMap;

/// One row ready for linking.
pub(crate) struct ForestEntry<T> {
    pub id: String,
    pub parent_id: Option<String>,
    pub payload: T,
}

pub(crate) struct Forest<N> {
    pub roots: Vec<N>,
    /// Ids promoted to roots to break parent cycles, in promotion order.
    pub promoted: Vec<String>,
}

/// Link entries into a forest. Duplicate ids keep their first occurrence.
///
/// `build` receives the node id, its payload and its already-built children
/// (in input order) and returns the finished node.
pub(crate) fn build_forest<T, N>(
    entries: Vec<ForestEntry<T>>,
    mut build: impl FnMut(String, T, Vec<N>) -> N,
) -> Forest<N> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    let mut unique: Vec<ForestEntry<T>> = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.id.is_empty() || index.contains_key(&entry.id) {
            continue;
        }
        index.insert(entry.id.clone(), unique.len());
        unique.push(entry);
    }

    let count = unique.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut root_ids: Vec<usize> = Vec::new();
    for (position, entry) in unique.iter().enumerate() {
        let parent = entry
            .parent_id
            .as_deref()
            .filter(|parent| !parent.is_empty() && *parent != entry.id)
            .and_then(|parent| index.get(parent).copied());
        match parent {
            Some(parent) => children[parent].push(position),
            None => root_ids.push(position),
        }
    }

    let mut placed = vec![false; count];
    let mut tree_children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut order: Vec<usize> = Vec::with_capacity(count);
    let mut roots = Vec::new();
    let mut promoted = Vec::new();

    for &root in &root_ids {
        walk(root, &children, &mut placed, &mut tree_children, &mut order);
        roots.push(root);
    }
    for position in 0..count {
        if !placed[position] {
            promoted.push(unique[position].id.clone());
            walk(position, &children, &mut placed, &mut tree_children, &mut order);
            roots.push(position);
        }
    }

    // Pre-order puts every parent before its children, so building in
    // reverse order always finds the children finished.
    let mut payloads: Vec<Option<ForestEntry<T>>> = unique.into_iter().map(Some).collect();
    let mut built: Vec<Option<N>> = (0..count).map(|_| None).collect();
    for &position in order.iter().rev() {
        let Some(entry) = payloads[position].take() else {
            continue;
        };
        let kids = tree_children[position]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[position] = Some(build(entry.id, entry.payload, kids));
    }

    Forest {
        roots: roots
            .into_iter()
            .filter_map(|root| built[root].take())
            .collect(),
        promoted,
    }
}

fn walk(
    start: usize,
    children: &[Vec<usize>],
    placed: &mut [bool],
    tree_children: &mut [Vec<usize>],
    order: &mut Vec<usize>,
) {
    placed[start] = true;
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        order.push(node);
        for &child in children[node].iter().rev() {
            if placed[child] {
                continue;
            }
            placed[child] = true;
            tree_children[node].push(child);
            stack.push(child);
        }
        // Children were collected in reverse to keep the stack in input order.
        tree_children[node].reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Node {
        id: String,
        children: Vec<Node>,
    }

    fn entry(id: &str, parent: &str) -> ForestEntry<()> {
        ForestEntry {
            id: id.to_string(),
            parent_id: Some(parent.to_string()),
            payload: (),
        }
    }

    fn build(entries: Vec<ForestEntry<()>>) -> Forest<Node> {
        build_forest(entries, |id, (), children| Node { id, children })
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn orphans_become_roots() {
        let forest = build(vec![entry("a", ""), entry("b", "a"), entry("c", "zzz")]);
        assert_eq!(ids(&forest.roots), vec!["a", "c"]);
        assert_eq!(ids(&forest.roots[0].children), vec!["b"]);
        assert!(forest.promoted.is_empty());
    }

    #[test]
    fn children_keep_input_order() {
        let forest = build(vec![
            entry("root", ""),
            entry("x", "root"),
            entry("y", "root"),
            entry("z", "root"),
        ]);
        assert_eq!(ids(&forest.roots[0].children), vec!["x", "y", "z"]);
    }

    #[test]
    fn parent_cycle_is_broken_at_first_node() {
        let forest = build(vec![entry("a", "b"), entry("b", "a"), entry("c", "b")]);
        assert_eq!(forest.promoted, vec!["a".to_string()]);
        assert_eq!(ids(&forest.roots), vec!["a"]);
        let b = &forest.roots[0].children[0];
        assert_eq!(b.id, "b");
        assert_eq!(ids(&b.children), vec!["c"]);
    }

    #[test]
    fn self_parent_is_a_root() {
        let forest = build(vec![entry("a", "a")]);
        assert_eq!(ids(&forest.roots), vec!["a"]);
        assert!(forest.promoted.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let forest = build(vec![entry("a", ""), entry("a", "zzz"), entry("b", "a")]);
        assert_eq!(ids(&forest.roots), vec!["a"]);
        assert_eq!(ids(&forest.roots[0].children), vec!["b"]);
    }
}
