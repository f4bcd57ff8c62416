//! Lazy traversals over a [`Forest`].
//!
//! Both walkers borrow the forest immutably and yield nodes on demand, so a
//! name lookup stops as soon as it hits a match.

use super::{Forest, NodeId, TreeNode};

/// Depth-first preorder traversal of one tree: the root, then each child's
/// subtree in child order.
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    forest: &'a Forest,
    stack: Vec<NodeId>,
}

impl<'a> Preorder<'a> {
    pub(crate) fn new(forest: &'a Forest, root: NodeId) -> Self {
        Self {
            forest,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.forest.node(id);
        // Reversed so the first child is popped next.
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

/// Walks parent back-references from a node up to its root, excluding the
/// starting node itself.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    forest: &'a Forest,
    next: Option<NodeId>,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(forest: &'a Forest, start: NodeId) -> Self {
        Self {
            forest,
            next: forest.node(start).parent,
        }
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.forest.node(self.next?);
        self.next = node.parent;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::ClassDeclaration;
    use crate::hierarchy::HierarchyBuilder;

    fn names<'a>(nodes: impl Iterator<Item = &'a crate::hierarchy::TreeNode>) -> Vec<&'a str> {
        nodes.map(|node| node.name()).collect()
    }

    #[test]
    fn test_preorder_visits_root_then_children_in_order() {
        let forest = HierarchyBuilder::build(vec![
            ClassDeclaration::new("A"),
            ClassDeclaration::new("B").extends("A"),
            ClassDeclaration::new("C").extends("A"),
            ClassDeclaration::new("D").extends("B"),
        ]);

        let root = forest.roots()[0];
        assert_eq!(names(forest.preorder(root)), vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn test_preorder_is_restartable() {
        let forest = HierarchyBuilder::build(vec![
            ClassDeclaration::new("A"),
            ClassDeclaration::new("B").extends("A"),
        ]);

        let root = forest.roots()[0];
        let first = names(forest.preorder(root));
        let second = names(forest.preorder(root));
        assert_eq!(first, second);
    }

    #[test]
    fn test_preorder_of_leaf_yields_only_leaf() {
        let forest = HierarchyBuilder::build(vec![
            ClassDeclaration::new("A"),
            ClassDeclaration::new("B").extends("A"),
        ]);

        let leaf = forest.find("B").unwrap();
        assert_eq!(names(forest.preorder(leaf)), vec!["B"]);
    }

    #[test]
    fn test_ancestors_walk_strictly_upward() {
        let forest = HierarchyBuilder::build(vec![
            ClassDeclaration::new("A"),
            ClassDeclaration::new("B").extends("A"),
            ClassDeclaration::new("Sibling").extends("A"),
            ClassDeclaration::new("C").extends("B"),
        ]);

        let c = forest.find("C").unwrap();
        assert_eq!(names(forest.ancestors(c)), vec!["B", "A"]);

        let a = forest.find("A").unwrap();
        assert_eq!(forest.ancestors(a).count(), 0);
    }
}
