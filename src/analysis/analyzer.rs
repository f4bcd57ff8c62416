//! Override discovery and report assembly.
//!
//! Every non-constructor method of every class is matched against the
//! nearest class on its direct parent chain that declares a method of the
//! same name. Sibling branches and descendants are never consulted, and the
//! search stops at the first ancestor that declares the name whether or not
//! the signatures agree.

use super::comparator::{compare, DiscrepancyKind};
use crate::core::{MethodSignature, SourceLocation};
use crate::hierarchy::{Forest, NodeId, TreeNode};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameter names at one position of the two signatures. `None` marks a
/// position past the end of that signature's parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterPair {
    pub ancestor: Option<String>,
    pub descendant: Option<String>,
}

/// One incompatible override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyReport {
    pub ancestor_class: String,
    pub ancestor_method: String,
    pub descendant_class: String,
    pub descendant_method: String,
    pub kind: DiscrepancyKind,
    pub parameter_pairs: Vec<ParameterPair>,
    /// Descendant class file and method line, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl DiscrepancyReport {
    /// `Class::method` of the overridden method.
    pub fn ancestor_id(&self) -> String {
        format!("{}::{}", self.ancestor_class, self.ancestor_method)
    }

    /// `Class::method` of the override.
    pub fn descendant_id(&self) -> String {
        format!("{}::{}", self.descendant_class, self.descendant_method)
    }
}

/// Pair parameter names by position.
///
/// The result always has `max(len) + 1` entries; the last one is absent on
/// both sides, matching the inclusive bound the report tables have always
/// been drawn with.
pub fn pair_parameters(
    ancestor: &MethodSignature,
    descendant: &MethodSignature,
) -> Vec<ParameterPair> {
    let slots = ancestor.parameters.len().max(descendant.parameters.len()) + 1;
    (0..slots)
        .map(|position| ParameterPair {
            ancestor: ancestor.parameters.get(position).map(|p| p.name.clone()),
            descendant: descendant.parameters.get(position).map(|p| p.name.clone()),
        })
        .collect()
}

/// Runs the signature comparator over a finished forest.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyAnalyzer<'a> {
    forest: &'a Forest,
}

impl<'a> HierarchyAnalyzer<'a> {
    pub fn new(forest: &'a Forest) -> Self {
        Self { forest }
    }

    /// Reports in forest preorder, then method declaration order.
    pub fn analyze(&self) -> Vec<DiscrepancyReport> {
        self.forest
            .roots()
            .iter()
            .flat_map(|&root| self.analyze_tree(root))
            .collect()
    }

    /// Same output as [`analyze`](Self::analyze), with independent trees
    /// checked on the rayon pool.
    pub fn analyze_parallel(&self) -> Vec<DiscrepancyReport> {
        let per_tree: Vec<Vec<DiscrepancyReport>> = self
            .forest
            .roots()
            .par_iter()
            .map(|&root| self.analyze_tree(root))
            .collect();
        per_tree.into_iter().flatten().collect()
    }

    /// Reports for every node of the tree rooted at `root`.
    pub fn analyze_tree(&self, root: NodeId) -> Vec<DiscrepancyReport> {
        let mut reports = Vec::new();
        for node in self.forest.preorder(root) {
            self.check_node(node, &mut reports);
        }
        reports
    }

    fn check_node(&self, node: &TreeNode, reports: &mut Vec<DiscrepancyReport>) {
        for method in &node.declaration().methods {
            if method.is_constructor() {
                continue;
            }
            let Some((ancestor, overridden)) = self.nearest_declaration(node.id(), &method.name)
            else {
                continue;
            };

            let kind = compare(overridden, method);
            if kind.is_compatible() {
                continue;
            }

            debug!(
                ancestor = %format!("{}::{}", ancestor.name(), overridden.name),
                descendant = %format!("{}::{}", node.name(), method.name),
                code = kind.code(),
                "Signature mismatch"
            );
            reports.push(DiscrepancyReport {
                ancestor_class: ancestor.name().to_string(),
                ancestor_method: overridden.name.clone(),
                descendant_class: node.name().to_string(),
                descendant_method: method.name.clone(),
                kind,
                parameter_pairs: pair_parameters(overridden, method),
                location: node.declaration().location.as_ref().map(|class_location| {
                    SourceLocation::new(
                        class_location.file.clone(),
                        method.line.unwrap_or(class_location.line),
                    )
                }),
            });
        }
    }

    /// The closest ancestor of `id` declaring a method named `name`, with
    /// that method. Only the direct parent chain is searched.
    pub fn nearest_declaration(
        &self,
        id: NodeId,
        name: &str,
    ) -> Option<(&'a TreeNode, &'a MethodSignature)> {
        self.forest.ancestors(id).find_map(|ancestor| {
            ancestor
                .declaration()
                .method(name)
                .map(|method| (ancestor, method))
        })
    }
}

/// Analyze a whole forest sequentially.
pub fn analyze(forest: &Forest) -> Vec<DiscrepancyReport> {
    HierarchyAnalyzer::new(forest).analyze()
}
