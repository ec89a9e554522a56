//! Type resolution: unwrapping wrapper chains and classifying named types.

use crate::registry::SchemaRegistry;
use crate::types::{TypeData, TypeKind, TypeRef};

/// Prefix reserved for introspection meta types (`__Type`, `__Schema`, ...).
pub const META_TYPE_PREFIX: &str = "__";

/// How a named type participates in a selection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// Needs a nested selection set.
    Object,
    /// Selected as a leaf; values are enum names.
    Enum,
    /// Selected as a leaf.
    Scalar,
}

/// Strips list / non-null wrappers and returns the named reference.
#[must_use]
pub fn unwrap_to_named(type_ref: &TypeRef) -> &TypeRef {
    match type_ref {
        TypeRef::Named { .. } => type_ref,
        TypeRef::List(inner) | TypeRef::NonNull(inner) => unwrap_to_named(inner),
    }
}

/// `true` for `[T]` and `[T]!`.
#[must_use]
pub fn is_list(type_ref: &TypeRef) -> bool {
    match type_ref {
        TypeRef::List(_) => true,
        TypeRef::NonNull(inner) => matches!(**inner, TypeRef::List(_)),
        TypeRef::Named { .. } => false,
    }
}

/// `true` iff the outermost modifier is non-null.
#[must_use]
pub fn is_required(type_ref: &TypeRef) -> bool {
    matches!(type_ref, TypeRef::NonNull(_))
}

impl SchemaRegistry {
    /// Classifies a named type.
    ///
    /// Meta types and the query / mutation roots are never object-like or
    /// enum-like; they fall through to [`TypeClass::Scalar`]. Interfaces and
    /// unions are leaves as well.
    #[must_use]
    pub fn classify(&self, type_data: &TypeData) -> TypeClass {
        if self.is_excluded(&type_data.name) {
            return TypeClass::Scalar;
        }
        match type_data.kind {
            TypeKind::Object | TypeKind::InputObject => TypeClass::Object,
            TypeKind::Enum => TypeClass::Enum,
            _ => TypeClass::Scalar,
        }
    }

    /// `OBJECT` or `INPUT_OBJECT`, excluding meta and root types.
    #[must_use]
    pub fn is_object_like(&self, type_data: &TypeData) -> bool {
        self.classify(type_data) == TypeClass::Object
    }

    /// `ENUM`, excluding meta types.
    #[must_use]
    pub fn is_enum_like(&self, type_data: &TypeData) -> bool {
        self.classify(type_data) == TypeClass::Enum
    }

    #[must_use]
    pub fn is_object_or_enum_like(&self, type_data: &TypeData) -> bool {
        matches!(self.classify(type_data), TypeClass::Object | TypeClass::Enum)
    }

    fn is_excluded(&self, name: &str) -> bool {
        name.starts_with(META_TYPE_PREFIX) || self.is_root_type_name(name)
    }
}
