//! Operation requests and the batches they are folded into.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ClientError;
use crate::Result;

/// One argument passed to a root field, bound to a document variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    /// Argument name on the root field.
    pub name: String,
    /// Runtime value sent in the `variables` map.
    pub value: Value,
    /// Declared GraphQL type, e.g. `ID!`. `None` falls back to `String!`.
    pub graphql_type: Option<String>,
}

impl VariableBinding {
    /// Creates a binding without a declared type.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            graphql_type: None,
        }
    }

    /// Creates a binding with a declared GraphQL type.
    #[must_use]
    pub fn typed(
        name: impl Into<String>,
        value: impl Into<Value>,
        graphql_type: impl Into<String>,
    ) -> Self {
        Self {
            graphql_type: Some(graphql_type.into()),
            ..Self::new(name, value)
        }
    }
}

/// A request for one root field, placed in a batch under an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryItem {
    /// Root field to invoke.
    pub field: String,
    /// Selection body for composite results, without the outer braces.
    pub selection: Option<String>,
    /// Arguments, in the order they appear in the invocation.
    pub variables: Vec<VariableBinding>,
}

impl QueryItem {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            selection: None,
            variables: Vec::new(),
        }
    }

    /// Sets the selection body.
    #[must_use]
    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }

    /// Appends a binding.
    #[must_use]
    pub fn with_variable(mut self, binding: VariableBinding) -> Self {
        self.variables.push(binding);
        self
    }

    /// Appends an untyped binding.
    #[must_use]
    pub fn variable(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_variable(VariableBinding::new(name, value))
    }

    /// Appends a typed binding.
    #[must_use]
    pub fn typed_variable(
        self,
        name: impl Into<String>,
        value: impl Into<Value>,
        graphql_type: impl Into<String>,
    ) -> Self {
        self.with_variable(VariableBinding::typed(name, value, graphql_type))
    }
}

/// Alias-keyed items that compile into one document.
///
/// Aliases are unique and iteration follows insertion order, which is the
/// order item bodies and variables appear in the compiled document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBatch {
    items: IndexMap<String, QueryItem>,
}

impl QueryBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item under `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DuplicateAlias`] if the alias is taken.
    pub fn insert(&mut self, alias: impl Into<String>, item: QueryItem) -> Result<()> {
        let alias = alias.into();
        if self.items.contains_key(&alias) {
            return Err(ClientError::DuplicateAlias { alias });
        }
        self.items.insert(alias, item);
        Ok(())
    }

    /// Builder form of [`Self::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DuplicateAlias`] if the alias is taken.
    pub fn with_item(mut self, alias: impl Into<String>, item: QueryItem) -> Result<Self> {
        self.insert(alias, item)?;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&QueryItem> {
        self.items.get(alias)
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryItem)> {
        self.items.iter().map(|(alias, item)| (alias.as_str(), item))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes all items, returning them as a new batch.
    pub fn take(&mut self) -> QueryBatch {
        std::mem::take(self)
    }
}

/// `true` iff the batch holds at least one item.
///
/// Callers check this before executing to avoid sending an empty operation.
#[must_use]
pub fn query_has_items(batch: &QueryBatch) -> bool {
    !batch.is_empty()
}
