//! Inheritance forest reconstruction.
//!
//! Class records arrive in encounter order, not hierarchy order: a subclass
//! may be seen before its parent, and some parents are never seen at all.
//! [`HierarchyBuilder`] resolves both directions incrementally:
//!
//! - When a class arrives, every current root that names it as parent is
//!   moved under it (forward references).
//! - The class itself is then attached under the first node in the forest
//!   carrying its parent's name, or kept as a root when none exists.
//!
//! Nodes live in an arena owned by the [`Forest`]; parent links are plain
//! [`NodeId`]s, so there are no ownership cycles between parents and
//! children. A node is never attached below a node of its own subtree,
//! which keeps the forest acyclic without any post-hoc check.

pub mod walker;

pub use walker::{Ancestors, Preorder};

use crate::core::ClassDeclaration;
use serde::Serialize;
use tracing::{debug, trace};

/// Index of a node inside the forest that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

/// One class in the forest.
#[derive(Debug, Clone)]
pub struct TreeNode {
    id: NodeId,
    declaration: ClassDeclaration,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn declaration(&self) -> &ClassDeclaration {
        &self.declaration
    }

    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in attachment order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The set of inheritance trees built from a stream of class records.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root nodes in the order they became roots.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Panics if `id` was not produced by this forest.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<&TreeNode> {
        self.node(id).parent.map(|parent| self.node(parent))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> + '_ {
        self.node(id).children.iter().map(move |&child| self.node(child))
    }

    /// The direct parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors::new(self, id)
    }

    /// Preorder traversal of the tree rooted at `root`.
    pub fn preorder(&self, root: NodeId) -> Preorder<'_> {
        Preorder::new(self, root)
    }

    /// Every node of every tree: roots in root order, each followed by its
    /// subtree in preorder.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.roots.iter().flat_map(move |&root| self.preorder(root))
    }

    /// First node named `name` in forest preorder. Duplicate names are not
    /// flagged; the first one encountered wins.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|node| node.name() == name).map(TreeNode::id)
    }

    /// Number of parent edges between `id` and its root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Roots whose class declares a parent that was never resolved.
    pub fn orphans(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.roots
            .iter()
            .map(move |&root| self.node(root))
            .filter(|node| node.declaration.parent_name.is_some())
    }

    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            classes: self.len(),
            roots: self.roots.len(),
            orphans: self.orphans().count(),
            max_depth: self
                .nodes
                .iter()
                .map(|node| self.depth(node.id))
                .max()
                .unwrap_or(0),
        }
    }

    fn push(&mut self, declaration: ClassDeclaration) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            id,
            declaration,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }
}

impl FromIterator<ClassDeclaration> for Forest {
    fn from_iter<I: IntoIterator<Item = ClassDeclaration>>(iter: I) -> Self {
        HierarchyBuilder::build(iter)
    }
}

/// Summary numbers for a finished forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    pub classes: usize,
    pub roots: usize,
    pub orphans: usize,
    pub max_depth: usize,
}

/// Builds a [`Forest`] one class record at a time.
///
/// Insertion order matters: forward-reference resolution only looks at the
/// roots present when a class arrives. Unknown or duplicate names never
/// fail; a class whose parent cannot be found becomes a root.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    forest: Forest,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every declaration in iteration order and return the result.
    pub fn build<I>(declarations: I) -> Forest
    where
        I: IntoIterator<Item = ClassDeclaration>,
    {
        let mut builder = Self::new();
        for declaration in declarations {
            builder.insert(declaration);
        }
        builder.into_forest()
    }

    pub fn insert(&mut self, declaration: ClassDeclaration) -> NodeId {
        let id = self.forest.push(declaration);
        self.adopt_waiting_roots(id);

        let parent_name = match self.forest.node(id).declaration.parent_name.clone() {
            Some(parent_name) => parent_name,
            None => {
                self.forest.roots.push(id);
                return id;
            }
        };

        // The new node is not reachable from the root set yet, so the search
        // can never land inside its own subtree.
        match self.forest.find(&parent_name) {
            Some(parent) => {
                trace!(
                    class = %self.forest.node(id).name(),
                    parent = %parent_name,
                    "Attached to existing parent"
                );
                self.forest.attach(parent, id);
            }
            None => {
                debug!(
                    class = %self.forest.node(id).name(),
                    parent = %parent_name,
                    "Parent not seen yet, keeping class as a root"
                );
                self.forest.roots.push(id);
            }
        }
        id
    }

    /// Move every current root that declares `id`'s class as its parent
    /// under `id`, preserving root order among the moved nodes.
    fn adopt_waiting_roots(&mut self, id: NodeId) {
        let forest = &mut self.forest;
        let name = forest.nodes[id.0].declaration.name.as_str();
        let (adopted, remaining): (Vec<NodeId>, Vec<NodeId>) =
            forest.roots.iter().partition(|&&root| {
                forest.nodes[root.0].declaration.parent_name.as_deref() == Some(name)
            });

        if adopted.is_empty() {
            return;
        }
        forest.roots = remaining;
        for child in adopted {
            forest.attach(id, child);
        }
    }

    pub fn into_forest(self) -> Forest {
        self.forest
    }
}
