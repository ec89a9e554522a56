//! Lookup-by-name over the introspected types.

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::introspection;
use crate::types::{FieldData, OperationKind, TypeData, TypeRef};
use crate::Result;

/// The type graph of one GraphQL server.
///
/// Built once from an introspection response and read-only afterwards.
/// Types keep the order the server listed them in.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    types: IndexMap<String, TypeData>,
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl SchemaRegistry {
    /// Builds a registry from already-validated types.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeNotFound`] if a root type or any field,
    /// argument or input-field type is not among `types`, and
    /// [`SchemaError::Malformed`] if two types share a name.
    pub fn new(
        query_type: impl Into<String>,
        mutation_type: Option<String>,
        subscription_type: Option<String>,
        types: Vec<TypeData>,
    ) -> Result<Self> {
        let mut by_name = IndexMap::with_capacity(types.len());
        for type_data in types {
            let name = type_data.name.clone();
            if by_name.insert(name.clone(), type_data).is_some() {
                return Err(SchemaError::malformed(format!("duplicate type {name}")));
            }
        }
        let types = by_name;
        let registry = Self {
            types,
            query_type: query_type.into(),
            mutation_type,
            subscription_type,
        };
        registry.validate_references()?;

        tracing::info!(
            types = registry.types.len(),
            query = %registry.query_type,
            mutation = ?registry.mutation_type,
            "Loaded schema"
        );
        Ok(registry)
    }

    /// Parses an introspection response from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or fails validation.
    pub fn from_introspection_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_introspection_value(value)
    }

    /// Builds a registry from a decoded introspection response.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed, a wrapper chain exceeds
    /// [`introspection::MAX_WRAPPER_DEPTH`], or a referenced type is missing.
    pub fn from_introspection_value(value: serde_json::Value) -> Result<Self> {
        let decoded = introspection::decode(value)?;
        Self::new(
            decoded.query_type,
            decoded.mutation_type,
            decoded.subscription_type,
            decoded.types,
        )
    }

    fn validate_references(&self) -> Result<()> {
        self.get(&self.query_type)?;
        if let Some(mutation) = &self.mutation_type {
            self.get(mutation)?;
        }
        if let Some(subscription) = &self.subscription_type {
            self.get(subscription)?;
        }

        for ty in self.types.values() {
            for field in ty.fields.iter().flatten() {
                self.resolve(&field.type_ref)?;
                for arg in &field.args {
                    self.resolve(&arg.type_ref)?;
                }
            }
            for input in ty.input_fields.iter().flatten() {
                self.resolve(&input.type_ref)?;
            }
        }
        Ok(())
    }

    /// Looks a type up by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeNotFound`] if the name is unknown.
    pub fn get(&self, name: &str) -> Result<&TypeData> {
        self.types
            .get(name)
            .ok_or_else(|| SchemaError::type_not_found(name))
    }

    /// Looks a type up by name, returning `None` if it is unknown.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TypeData> {
        self.types.get(name)
    }

    /// Resolves a reference to the named type it ultimately points at.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeNotFound`] if the named type is unknown.
    pub fn resolve(&self, type_ref: &TypeRef) -> Result<&TypeData> {
        self.get(type_ref.name())
    }

    /// Name of the query root type.
    #[must_use]
    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    /// Name of the mutation root type, if the schema has one.
    #[must_use]
    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    /// Name of the subscription root type, if the schema has one.
    #[must_use]
    pub fn subscription_type_name(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    /// Returns `true` if `name` is the query or mutation root.
    #[must_use]
    pub fn is_root_type_name(&self, name: &str) -> bool {
        name == self.query_type || self.mutation_type.as_deref() == Some(name)
    }

    /// The root type for an operation kind.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingRootType`] for a mutation when the
    /// schema defines no mutation root.
    pub fn root_type(&self, kind: OperationKind) -> Result<&TypeData> {
        match kind {
            OperationKind::Query => self.get(&self.query_type),
            OperationKind::Mutation => {
                let name = self
                    .mutation_type
                    .as_deref()
                    .ok_or_else(|| SchemaError::MissingRootType {
                        operation: kind.to_string(),
                    })?;
                self.get(name)
            }
        }
    }

    /// The root fields callable for an operation kind, in schema order.
    ///
    /// A schema without a mutation root has no mutation fields.
    #[must_use]
    pub fn root_fields(&self, kind: OperationKind) -> &[FieldData] {
        self.root_type(kind)
            .ok()
            .and_then(|t| t.fields.as_deref())
            .unwrap_or_default()
    }

    /// All types, in schema order.
    pub fn types(&self) -> impl Iterator<Item = &TypeData> {
        self.types.values()
    }

    /// Object-like types (see [`crate::TypeClass`]), in schema order.
    pub fn object_like_types(&self) -> impl Iterator<Item = &TypeData> {
        self.types.values().filter(|t| self.is_object_like(t))
    }

    /// Number of types in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the registry holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
