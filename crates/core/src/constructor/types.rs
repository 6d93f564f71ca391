use serde::Serialize;
use std::fmt;

/// Type text used when a field's declared type could not be determined.
pub const UNKNOWN_TYPE: &str = "[unknown]";

/// Identifier used when a named field has no readable identifier.
pub const UNNAMED_FIELD: &str = "[unnamed]";

/// A field as it appears in the source declaration, before analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawField {
    /// Declared identifier. Always `None` for tuple fields.
    pub ident: Option<String>,
    /// Textual rendering of the declared type, if one was found.
    pub type_text: Option<String>,
}

impl RawField {
    pub fn named(ident: &str, type_text: &str) -> Self {
        Self {
            ident: Some(ident.to_string()),
            type_text: Some(type_text.to_string()),
        }
    }

    pub fn positional(type_text: &str) -> Self {
        Self {
            ident: None,
            type_text: Some(type_text.to_string()),
        }
    }
}

/// Field list of a struct declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructBody {
    /// `struct S;`
    Unit,
    /// `struct S(A, B);`
    Tuple(Vec<RawField>),
    /// `struct S { a: A, b: B }`
    Named(Vec<RawField>),
}

/// Generic parameters of a struct, kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generics {
    /// Parameter list with bounds but no defaults, e.g. `<'a, T: Clone>`.
    pub params: String,
    /// Parameter names without bounds or defaults, e.g. `<'a, T>`.
    pub args: String,
    /// Trailing `where` clause, if any.
    pub where_clause: Option<String>,
}

/// Immutable snapshot of a struct declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub generics: Option<Generics>,
    pub body: StructBody,
}

/// Structural category of a struct declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructShape {
    Unit,
    Tuple,
    Named,
}

impl fmt::Display for StructShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructShape::Unit => write!(f, "unit"),
            StructShape::Tuple => write!(f, "tuple"),
            StructShape::Named => write!(f, "named"),
        }
    }
}

/// One candidate constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDescriptor {
    /// Zero-based declaration index.
    pub position: usize,
    /// Name used to address the field in a struct literal.
    pub accessor_name: String,
    /// Name of the constructor parameter.
    pub binding_name: String,
    pub type_text: String,
}

/// Constructor arguments are field descriptors scoped to generation.
pub type ConstructorArgument = FieldDescriptor;

impl FieldDescriptor {
    /// Label shown to whoever picks the parameters: `binding : type`.
    pub fn label(&self) -> String {
        format!("{} : {}", self.binding_name, self.type_text)
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.binding_name, self.type_text)
    }
}

/// Result of analyzing a [`StructDecl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructAnalysis {
    pub name: String,
    pub shape: StructShape,
    pub fields: Vec<FieldDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generics: Option<Generics>,
}

/// Outcome of a negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    /// Chosen candidates, in declaration order. May be empty.
    Selected(Vec<FieldDescriptor>),
    /// The presenter declined to choose.
    Cancelled,
}

impl SelectionResult {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SelectionResult::Cancelled)
    }
}
