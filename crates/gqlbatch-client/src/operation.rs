//! Schema-driven operation building.
//!
//! [`OperationBuilder`] turns "call root field `user` with `id = 42`" into a
//! [`QueryItem`] whose variables carry the argument types declared in the
//! schema and whose selection defaults to the synthesized selection set of
//! the result type. [`GraphQlQuery`] keeps a pending batch next to an
//! executor so callers can add items and execute them in one round trip.

use gqlbatch_schema::{FieldData, OperationKind, SchemaRegistry, TypeClass};
use serde_json::Value;

use crate::error::ClientError;
use crate::executor::{GraphQlResponse, QueryExecutor};
use crate::query::{QueryBatch, QueryItem, VariableBinding};
use crate::transport::Transport;
use crate::Result;

/// Builds a batch of root-field calls checked against a schema.
#[derive(Debug, Clone)]
pub struct OperationBuilder<'a> {
    registry: &'a SchemaRegistry,
    kind: OperationKind,
    batch: QueryBatch,
}

impl<'a> OperationBuilder<'a> {
    /// Starts an empty operation of kind `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Schema`] if the schema has no root type for
    /// `kind`.
    pub fn new(registry: &'a SchemaRegistry, kind: OperationKind) -> Result<Self> {
        registry.root_type(kind)?;
        Ok(Self {
            registry,
            kind,
            batch: QueryBatch::new(),
        })
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Builds an item for root field `field` without adding it.
    ///
    /// Arguments keep the caller's order. The selection is `selection` when
    /// given; otherwise object-like results get their default selection set
    /// and leaf results get none.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnknownRootField`] if the root type lacks `field`
    /// - [`ClientError::UnknownArgument`] for an argument the field does not
    ///   declare
    /// - [`ClientError::Schema`] if selection synthesis fails
    pub fn item<I, K>(&self, field: &str, args: I, selection: Option<String>) -> Result<QueryItem>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let field_data = self.root_field(field)?;

        let mut item = QueryItem::new(field);
        for (name, value) in args {
            let name: String = name.into();
            let arg = field_data
                .arg(&name)
                .ok_or_else(|| ClientError::UnknownArgument {
                    field: field.to_string(),
                    argument: name.clone(),
                })?;
            let graphql_type = arg.type_ref.to_graphql_string();
            item = item.with_variable(VariableBinding::typed(name, value, graphql_type));
        }

        let selection = match selection {
            Some(selection) => Some(selection),
            None => {
                let result_type = self.registry.resolve(&field_data.type_ref)?;
                if self.registry.classify(result_type) == TypeClass::Object {
                    Some(self.registry.default_selection(&result_type.name)?)
                } else {
                    None
                }
            }
        };
        item.selection = selection;
        Ok(item)
    }

    /// Adds a call to root field `field` under `alias`.
    ///
    /// # Errors
    ///
    /// See [`Self::item`]; additionally [`ClientError::DuplicateAlias`].
    pub fn field<I, K>(&mut self, alias: &str, field: &str, args: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let item = self.item(field, args, None)?;
        self.batch.insert(alias, item)?;
        Ok(self)
    }

    /// Adds a call with an explicit selection body.
    ///
    /// # Errors
    ///
    /// See [`Self::field`].
    pub fn field_with_selection<I, K>(
        &mut self,
        alias: &str,
        field: &str,
        selection: impl Into<String>,
        args: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let item = self.item(field, args, Some(selection.into()))?;
        self.batch.insert(alias, item)?;
        Ok(self)
    }

    /// The batch built so far.
    #[must_use]
    pub fn batch(&self) -> &QueryBatch {
        &self.batch
    }

    #[must_use]
    pub fn build(self) -> QueryBatch {
        self.batch
    }

    fn root_field(&self, field: &str) -> Result<&'a FieldData> {
        self.registry
            .root_fields(self.kind)
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| ClientError::UnknownRootField {
                operation: self.kind.to_string(),
                field: field.to_string(),
            })
    }
}

/// A pending batch bound to an executor and an operation kind.
#[derive(Debug)]
pub struct GraphQlQuery<'e, T> {
    executor: &'e QueryExecutor<T>,
    kind: OperationKind,
    batch: QueryBatch,
}

impl<'e, T: Transport> GraphQlQuery<'e, T> {
    #[must_use]
    pub fn new(executor: &'e QueryExecutor<T>, kind: OperationKind) -> Self {
        Self {
            executor,
            kind,
            batch: QueryBatch::new(),
        }
    }

    /// Queues an item under `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DuplicateAlias`] if the alias is already queued.
    pub fn add_item(&mut self, alias: impl Into<String>, item: QueryItem) -> Result<&mut Self> {
        self.batch.insert(alias, item)?;
        Ok(self)
    }

    /// Queues every item of `batch`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DuplicateAlias`] on the first clash; items
    /// before it stay queued.
    pub fn extend(&mut self, batch: QueryBatch) -> Result<&mut Self> {
        for (alias, item) in batch.iter() {
            self.batch.insert(alias, item.clone())?;
        }
        Ok(self)
    }

    #[must_use]
    pub fn has_items(&self) -> bool {
        crate::query::query_has_items(&self.batch)
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Executes the queued items and clears the queue.
    ///
    /// The queue is cleared even when execution fails.
    ///
    /// # Errors
    ///
    /// See [`QueryExecutor::execute`].
    pub async fn execute(&mut self) -> Result<GraphQlResponse> {
        let batch = self.batch.take();
        self.executor.execute(self.kind, &batch).await
    }
}
