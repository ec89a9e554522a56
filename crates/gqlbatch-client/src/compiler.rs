//! Query batch compiler.
//!
//! Folds every item of a [`QueryBatch`] into one document:
//!
//! ```text
//! query queryName($input0:ID!,$input1:String!){a:user(id:$input0){id},b:team(slug:$input1)}
//! ```
//!
//! Variables are allocated positionally (`$input0`, `$input1`, ...) by a
//! counter scoped to one compilation. Each item's argument list carries only
//! the variables that item produced.

use gqlbatch_schema::OperationKind;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::query::QueryBatch;

/// Name given to every compiled operation.
pub const OPERATION_NAME: &str = "queryName";

/// Declared type for bindings that do not carry one.
pub const DEFAULT_VARIABLE_TYPE: &str = "String!";

const VARIABLE_PREFIX: &str = "input";

/// A document ready for the wire: `{ "query": .., "variables": .. }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledDocument {
    pub query: String,
    /// Runtime values keyed by variable name without the `$` sigil.
    pub variables: IndexMap<String, Value>,
}

/// Compiles a batch into one document of the given operation kind.
///
/// An empty batch compiles to `<kind> queryName{}`.
#[must_use]
pub fn compile_batch(kind: OperationKind, batch: &QueryBatch) -> CompiledDocument {
    let mut counter = 0usize;
    let mut declared: Vec<(String, &str)> = Vec::new();
    let mut variables = IndexMap::new();

    let bodies: Vec<String> = batch
        .iter()
        .map(|(alias, item)| {
            let mut body = format!("{alias}:{}", item.field);

            let mut arguments = Vec::with_capacity(item.variables.len());
            for binding in &item.variables {
                let name = format!("{VARIABLE_PREFIX}{counter}");
                counter += 1;

                let graphql_type = binding
                    .graphql_type
                    .as_deref()
                    .unwrap_or(DEFAULT_VARIABLE_TYPE);
                declared.push((format!("${name}"), graphql_type));
                arguments.push(format!("{}:${name}", binding.name));
                variables.insert(name, binding.value.clone());
            }

            if !arguments.is_empty() {
                body.push('(');
                body.push_str(&arguments.join(", "));
                body.push(')');
            }
            if let Some(selection) = &item.selection {
                body.push('{');
                body.push_str(selection);
                body.push('}');
            }
            body
        })
        .collect();

    let mut query = format!("{kind} {OPERATION_NAME}");
    if !declared.is_empty() {
        let params: Vec<String> = declared
            .iter()
            .map(|(name, ty)| format!("{name}:{ty}"))
            .collect();
        query.push('(');
        query.push_str(&params.join(","));
        query.push(')');
    }
    query.push('{');
    query.push_str(&bodies.join(","));
    query.push('}');

    tracing::debug!(
        operation = %kind,
        items = batch.len(),
        variables = variables.len(),
        "Compiled batch"
    );

    CompiledDocument { query, variables }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryItem, VariableBinding};
    use serde_json::json;

    #[test]
    fn test_single_typed_variable() {
        let batch = QueryBatch::new()
            .with_item("a", QueryItem::new("user").typed_variable("id", "42", "ID!"))
            .unwrap();
        let doc = compile_batch(OperationKind::Query, &batch);

        assert_eq!(doc.query, "query queryName($input0:ID!){a:user(id:$input0)}");
        assert_eq!(doc.variables.len(), 1);
        assert_eq!(doc.variables["input0"], json!("42"));
    }

    #[test]
    fn test_empty_batch() {
        let doc = compile_batch(OperationKind::Query, &QueryBatch::new());
        assert_eq!(doc.query, "query queryName{}");
        assert!(doc.variables.is_empty());

        let doc = compile_batch(OperationKind::Mutation, &QueryBatch::new());
        assert_eq!(doc.query, "mutation queryName{}");
    }

    #[test]
    fn test_untyped_binding_defaults_to_string() {
        let batch = QueryBatch::new()
            .with_item("s", QueryItem::new("search").variable("term", "rust"))
            .unwrap();
        let doc = compile_batch(OperationKind::Query, &batch);
        assert_eq!(
            doc.query,
            "query queryName($input0:String!){s:search(term:$input0)}"
        );
    }

    #[test]
    fn test_selection_is_braced_without_padding() {
        let batch = QueryBatch::new()
            .with_item(
                "me",
                QueryItem::new("viewer").with_selection("id name friends { id }"),
            )
            .unwrap();
        let doc = compile_batch(OperationKind::Query, &batch);
        assert_eq!(doc.query, "query queryName{me:viewer{id name friends { id }}}");
    }

    #[test]
    fn test_numbering_spans_items_in_order() {
        let batch = QueryBatch::new()
            .with_item(
                "a",
                QueryItem::new("user")
                    .typed_variable("id", "1", "ID!")
                    .typed_variable("locale", "en", "String"),
            )
            .unwrap()
            .with_item("b", QueryItem::new("team").typed_variable("slug", "core", "String!"))
            .unwrap();
        let doc = compile_batch(OperationKind::Query, &batch);

        assert_eq!(
            doc.query,
            "query queryName($input0:ID!,$input1:String,$input2:String!)\
             {a:user(id:$input0, locale:$input1),b:team(slug:$input2)}"
        );
        let names: Vec<_> = doc.variables.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["input0", "input1", "input2"]);
        assert_eq!(doc.variables["input1"], json!("en"));
    }

    #[test]
    fn test_item_without_variables_gets_no_argument_list() {
        let batch = QueryBatch::new()
            .with_item("a", QueryItem::new("user").typed_variable("id", "1", "ID!"))
            .unwrap()
            .with_item("b", QueryItem::new("viewer").with_selection("id"))
            .unwrap();
        let doc = compile_batch(OperationKind::Query, &batch);

        assert_eq!(
            doc.query,
            "query queryName($input0:ID!){a:user(id:$input0),b:viewer{id}}"
        );
    }

    #[test]
    fn test_numbering_restarts_per_compilation() {
        let batch = QueryBatch::new()
            .with_item("a", QueryItem::new("user").variable("id", "1"))
            .unwrap();
        let first = compile_batch(OperationKind::Query, &batch);
        let second = compile_batch(OperationKind::Query, &batch);
        assert_eq!(first, second);
        assert!(second.variables.contains_key("input0"));
    }

    #[test]
    fn test_wire_shape() {
        let batch = QueryBatch::new()
            .with_item(
                "a",
                QueryItem::new("user").with_variable(VariableBinding::typed("id", 7, "Int!")),
            )
            .unwrap();
        let doc = compile_batch(OperationKind::Mutation, &batch);
        let wire = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            wire,
            json!({
                "query": "mutation queryName($input0:Int!){a:user(id:$input0)}",
                "variables": { "input0": 7 }
            })
        );
    }
}
