//! PHP class record extraction using tree-sitter-php.
//!
//! Only named `class_declaration`s become records. Interfaces, traits,
//! enums and anonymous classes are skipped, and a class body is never
//! searched for further classes.

use super::ClassExtractor;
use crate::core::errors::{Error, Result};
use crate::core::{
    ClassDeclaration, MethodSignature, ParameterSignature, SourceLocation, TypeRef,
};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

pub struct PhpExtractor {
    language: tree_sitter::Language,
}

impl Default for PhpExtractor {
    fn default() -> Self {
        Self {
            language: tree_sitter_php::LANGUAGE_PHP.into(),
        }
    }
}

impl PhpExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_tree(&self, source: &[u8], path: &Path) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| Error::parse(path, format!("Failed to set PHP language: {}", e)))?;
        parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(path, "Failed to parse PHP source"))
    }
}

impl ClassExtractor for PhpExtractor {
    fn extract(&self, source: &[u8], path: &Path) -> Result<Vec<ClassDeclaration>> {
        let tree = self.parse_tree(source, path)?;
        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(root).unwrap_or(1);
            return Err(Error::parse(path, format!("syntax error near line {}", line)));
        }

        let mut classes = Vec::new();
        collect_classes(root, source, path, &mut classes);
        Ok(classes)
    }
}

fn collect_classes(node: Node, source: &[u8], path: &Path, classes: &mut Vec<ClassDeclaration>) {
    if node.kind() == "class_declaration" {
        if let Some(class) = extract_class(&node, source, path) {
            classes.push(class);
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_classes(child, source, path, classes);
    }
}

fn extract_class(node: &Node, source: &[u8], path: &Path) -> Option<ClassDeclaration> {
    let name = node_name(node, source)?;
    let mut class = ClassDeclaration::new(name)
        .located_at(SourceLocation::new(path, node.start_position().row + 1));
    class.parent_name = extract_parent_name(node, source);

    let body = node
        .child_by_field_name("body")
        .or_else(|| find_child_by_kind(node, "declaration_list"));
    if let Some(body) = body {
        let mut cursor = body.walk();
        class.methods = body
            .named_children(&mut cursor)
            .filter(|member| member.kind() == "method_declaration")
            .filter_map(|member| extract_method(&member, source))
            .collect();
    }

    Some(class)
}

/// Short name of the `extends` target. Namespaces are not resolved, so
/// `\App\Base` and `Base` name the same parent.
///
/// This is the last segment on purpose. Taking the first segment would
/// resolve every namespaced parent to its vendor prefix (`App`).
fn extract_parent_name(node: &Node, source: &[u8]) -> Option<String> {
    let base = find_child_by_kind(node, "base_clause")?;
    let mut cursor = base.walk();
    let target = base
        .named_children(&mut cursor)
        .find(|child| matches!(child.kind(), "name" | "qualified_name"))?;
    let text = node_text(&target, source)?;
    text.rsplit('\\')
        .map(str::trim)
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

fn extract_method(node: &Node, source: &[u8]) -> Option<MethodSignature> {
    let mut method = MethodSignature::new(node_name(node, source)?)
        .at_line(node.start_position().row + 1);
    method.by_reference = has_reference_modifier(node);
    method.return_type = node
        .child_by_field_name("return_type")
        .and_then(|rt| type_ref(&rt, source));

    let params = node
        .child_by_field_name("parameters")
        .or_else(|| find_child_by_kind(node, "formal_parameters"));
    if let Some(params) = params {
        let mut cursor = params.walk();
        method.parameters = params
            .named_children(&mut cursor)
            .filter_map(|param| extract_parameter(&param, source))
            .collect();
    }

    Some(method)
}

fn extract_parameter(node: &Node, source: &[u8]) -> Option<ParameterSignature> {
    let variadic = match node.kind() {
        "simple_parameter" | "property_promotion_parameter" => false,
        "variadic_parameter" => true,
        _ => return None,
    };

    let raw_name = node
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, source))
        .unwrap_or_default();

    Some(ParameterSignature {
        name: raw_name.trim_start_matches('$').to_string(),
        by_reference: has_reference_modifier(node),
        param_type: node
            .child_by_field_name("type")
            .and_then(|t| type_ref(&t, source)),
        has_default: !variadic && node.child_by_field_name("default_value").is_some(),
    })
}

/// Map a type node onto the closed [`TypeRef`] model.
///
/// Class names become qualified paths. Primitive names stay scalar, and so
/// does every composite form (`?T`, unions, intersections), kept as its
/// whitespace-free source text.
fn type_ref(node: &Node, source: &[u8]) -> Option<TypeRef> {
    match node.kind() {
        "primitive_type" | "bottom_type" => node_text(node, source).map(TypeRef::Scalar),
        "named_type" | "name" | "qualified_name" => {
            node_text(node, source).map(|text| TypeRef::qualified(&text))
        }
        "union_type" | "intersection_type" | "disjunctive_normal_form_type"
            if node.named_child_count() == 1 =>
        {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).next()?;
            type_ref(&inner, source)
        }
        _ => node_text(node, source).map(|text| {
            TypeRef::Scalar(text.chars().filter(|c| !c.is_whitespace()).collect())
        }),
    }
}

fn has_reference_modifier(node: &Node) -> bool {
    node.child_by_field_name("reference_modifier").is_some()
        || find_child_by_kind(node, "reference_modifier").is_some()
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_line)
}

/// Source text of `node`. Bytes that are not UTF-8 are replaced rather than
/// failing the lookup.
fn node_text(node: &Node, source: &[u8]) -> Option<String> {
    source
        .get(node.byte_range())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

fn node_name(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("name")
        .and_then(|n| node_text(&n, source))
}

fn find_child_by_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).find(|c| c.kind() == kind);
    result
}
