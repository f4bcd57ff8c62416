pub mod errors;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Method name that marks a constructor. Constructors are never compared.
pub const CONSTRUCTOR_NAME: &str = "__construct";

/// Where a declaration was found in the scanned sources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize, // 1-based
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// A declared type, either a primitive name or a class-name path.
///
/// Equality is structural: `Qualified(["Foo", "Bar"])` only equals another
/// qualified path with the same segments in the same order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Scalar(String),
    Qualified(Vec<String>),
}

impl TypeRef {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    /// Build a qualified path from a `\`-separated class name.
    ///
    /// A leading separator is dropped: `\App\Model` and `App\Model` yield the
    /// same segments.
    pub fn qualified(path: &str) -> Self {
        Self::Qualified(
            path.split('\\')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => write!(f, "{}", name),
            Self::Qualified(segments) => write!(f, "{}", segments.join("\\")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSignature {
    pub name: String,
    #[serde(default)]
    pub by_reference: bool,
    #[serde(default, rename = "type")]
    pub param_type: Option<TypeRef>,
    #[serde(default)]
    pub has_default: bool,
}

impl ParameterSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_reference: false,
            param_type: None,
            has_default: false,
        }
    }

    pub fn typed(mut self, param_type: TypeRef) -> Self {
        self.param_type = Some(param_type);
        self
    }

    pub fn by_reference(mut self) -> Self {
        self.by_reference = true;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    #[serde(default)]
    pub by_reference: bool,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<ParameterSignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_reference: false,
            return_type: None,
            parameters: Vec::new(),
            line: None,
        }
    }

    pub fn by_reference(mut self) -> Self {
        self.by_reference = true;
        self
    }

    pub fn returns(mut self, return_type: TypeRef) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn param(mut self, parameter: ParameterSignature) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }
}

/// One class as produced by the source extractor.
///
/// Names are unique by convention only; nothing downstream enforces it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_name: None,
            methods: Vec::new(),
            location: None,
        }
    }

    pub fn extends(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    pub fn with_method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    pub fn located_at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// First method with the given name, in declaration order.
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|method| method.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_drops_leading_separator() {
        assert_eq!(TypeRef::qualified("\\App\\Model"), TypeRef::qualified("App\\Model"));
        assert_eq!(
            TypeRef::qualified("App\\Model"),
            TypeRef::Qualified(vec!["App".to_string(), "Model".to_string()])
        );
    }

    #[test]
    fn test_scalar_and_qualified_never_equal() {
        assert_ne!(TypeRef::scalar("Foo"), TypeRef::qualified("Foo"));
        assert!(TypeRef::scalar("int").is_scalar());
        assert!(!TypeRef::qualified("Foo").is_scalar());
    }

    #[test]
    fn test_constructor_detection() {
        assert!(MethodSignature::new("__construct").is_constructor());
        assert!(!MethodSignature::new("construct").is_constructor());
    }

    #[test]
    fn test_method_lookup_returns_first_match() {
        let class = ClassDeclaration::new("A")
            .with_method(MethodSignature::new("foo").at_line(3))
            .with_method(MethodSignature::new("foo").at_line(9));
        assert_eq!(class.method("foo").and_then(|m| m.line), Some(3));
        assert!(class.method("bar").is_none());
    }

    #[test]
    fn test_declaration_deserializes_with_defaults() {
        let json = r#"{"name": "B", "parent_name": "A", "methods": [{"name": "run"}]}"#;
        let class: ClassDeclaration = serde_json::from_str(json).unwrap();
        assert_eq!(class.parent_name.as_deref(), Some("A"));
        assert_eq!(class.methods[0].parameters.len(), 0);
        assert!(!class.methods[0].by_reference);
        assert!(class.location.is_none());
    }
}
