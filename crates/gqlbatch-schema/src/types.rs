//! Strict model of the introspected type graph.
//!
//! The raw introspection payload is loosely typed; it is converted into these
//! types once, at load time, by [`crate::introspection`]. After that the graph
//! is read-only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// The `__TypeKind` of a type or type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    /// Returns the introspection spelling of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
        }
    }

    /// Returns `true` for `LIST` and `NON_NULL`.
    #[must_use]
    pub fn is_wrapper(&self) -> bool {
        matches!(self, Self::List | Self::NonNull)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCALAR" => Ok(Self::Scalar),
            "OBJECT" => Ok(Self::Object),
            "INTERFACE" => Ok(Self::Interface),
            "UNION" => Ok(Self::Union),
            "ENUM" => Ok(Self::Enum),
            "INPUT_OBJECT" => Ok(Self::InputObject),
            "LIST" => Ok(Self::List),
            "NON_NULL" => Ok(Self::NonNull),
            other => Err(SchemaError::malformed(format!("unknown type kind {other}"))),
        }
    }
}

/// The two operation kinds a batch can carry.
///
/// Subscriptions are deliberately absent: the schema may expose a
/// subscription root, but nothing consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// Returns the keyword used in a GraphQL document.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "mutation" => Ok(Self::Mutation),
            other => Err(SchemaError::malformed(format!(
                "unsupported operation kind {other}"
            ))),
        }
    }
}

/// A reference to a type, possibly wrapped in list / non-null modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A named type at the bottom of a wrapper chain.
    Named { kind: TypeKind, name: String },
    /// `[inner]`
    List(Box<TypeRef>),
    /// `inner!`
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a named reference.
    #[must_use]
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self::Named {
            kind,
            name: name.into(),
        }
    }

    /// Wraps `inner` in a list.
    #[must_use]
    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wraps `inner` in a non-null modifier.
    #[must_use]
    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// The kind of the outermost node.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Named { kind, .. } => *kind,
            Self::List(_) => TypeKind::List,
            Self::NonNull(_) => TypeKind::NonNull,
        }
    }

    /// The name of the underlying named type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name, .. } => name,
            Self::List(inner) | Self::NonNull(inner) => inner.name(),
        }
    }

    /// Number of wrapper nodes above the named type.
    #[must_use]
    pub fn wrapper_depth(&self) -> usize {
        match self {
            Self::Named { .. } => 0,
            Self::List(inner) | Self::NonNull(inner) => 1 + inner.wrapper_depth(),
        }
    }

    /// Renders the reference in GraphQL type syntax, e.g. `[ID!]!`.
    #[must_use]
    pub fn to_graphql_string(&self) -> String {
        match self {
            Self::Named { name, .. } => name.clone(),
            Self::List(inner) => format!("[{}]", inner.to_graphql_string()),
            Self::NonNull(inner) => format!("{}!", inner.to_graphql_string()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_graphql_string())
    }
}

/// An argument or input-object field.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub default_value: Option<String>,
}

impl InputValue {
    /// Creates an input value with no description or default.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_ref,
            default_value: None,
        }
    }
}

/// A field of an output type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    pub name: String,
    pub description: Option<String>,
    pub args: Vec<InputValue>,
    pub type_ref: TypeRef,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

impl FieldData {
    /// Creates a field without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            args: Vec::new(),
            type_ref,
            is_deprecated: false,
            deprecation_reason: None,
        }
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: InputValue) -> Self {
        self.args.push(arg);
        self
    }

    /// Looks up an argument by name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&InputValue> {
        self.args.iter().find(|a| a.name == name)
    }
}

/// One value of an enum type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

/// A named type from the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeData {
    pub kind: TypeKind,
    pub name: String,
    pub description: Option<String>,
    /// Present for object and interface types.
    pub fields: Option<Vec<FieldData>>,
    /// Present for input-object types.
    pub input_fields: Option<Vec<InputValue>>,
    /// Present for enum types.
    pub enum_values: Option<Vec<EnumValue>>,
}

impl TypeData {
    /// Creates a type with no members.
    #[must_use]
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: None,
            fields: None,
            input_fields: None,
            enum_values: None,
        }
    }

    /// Creates an output object type with the given fields.
    #[must_use]
    pub fn object(name: impl Into<String>, fields: Vec<FieldData>) -> Self {
        Self {
            fields: Some(fields),
            ..Self::new(TypeKind::Object, name)
        }
    }

    /// Creates an input object type with the given fields.
    #[must_use]
    pub fn input_object(name: impl Into<String>, fields: Vec<InputValue>) -> Self {
        Self {
            input_fields: Some(fields),
            ..Self::new(TypeKind::InputObject, name)
        }
    }

    /// Creates an enum type with the given value names.
    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|v| EnumValue {
                name: v.into(),
                description: None,
                is_deprecated: false,
                deprecation_reason: None,
            })
            .collect();
        Self {
            enum_values: Some(values),
            ..Self::new(TypeKind::Enum, name)
        }
    }

    /// Creates a scalar type.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Scalar, name)
    }

    /// The `(name, type)` pairs a selection set can draw from: output fields
    /// when present, input fields otherwise. `None` for types with neither.
    #[must_use]
    pub fn member_fields(&self) -> Option<Vec<(&str, &TypeRef)>> {
        if let Some(fields) = &self.fields {
            return Some(
                fields
                    .iter()
                    .map(|f| (f.name.as_str(), &f.type_ref))
                    .collect(),
            );
        }
        self.input_fields.as_ref().map(|fields| {
            fields
                .iter()
                .map(|f| (f.name.as_str(), &f.type_ref))
                .collect()
        })
    }

    /// Looks up an output field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldData> {
        self.fields.as_ref()?.iter().find(|f| f.name == name)
    }
}
