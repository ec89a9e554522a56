//! Integration tests for schema loading and selection synthesis.
//!
//! Schemas are written as introspection responses, the same shape a server
//! returns for the canonical introspection query.

use std::collections::HashMap;

use gqlbatch_schema::{OperationKind, SchemaError, SchemaRegistry, TypeClass};
use serde_json::{Value, json};

// =============================================================================
// Fixtures
// =============================================================================

fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

fn field(name: &str, type_ref: Value) -> Value {
    json!({ "name": name, "args": [], "type": type_ref, "isDeprecated": false })
}

fn object(name: &str, fields: Vec<Value>) -> Value {
    json!({ "kind": "OBJECT", "name": name, "fields": fields, "inputFields": null, "enumValues": null })
}

fn scalar(name: &str) -> Value {
    json!({ "kind": "SCALAR", "name": name, "fields": null })
}

fn schema(types: Vec<Value>) -> SchemaRegistry {
    let mut all = vec![
        object(
            "Query",
            vec![field("viewer", named("OBJECT", "A"))],
        ),
        object(
            "Mutation",
            vec![field("touch", named("SCALAR", "Boolean"))],
        ),
        scalar("ID"),
        scalar("String"),
        scalar("Boolean"),
        json!({
            "kind": "OBJECT", "name": "__Type",
            "fields": [field("name", named("SCALAR", "String"))]
        }),
    ];
    all.extend(types);
    SchemaRegistry::from_introspection_value(json!({
        "data": { "__schema": {
            "queryType": { "name": "Query" },
            "mutationType": { "name": "Mutation" },
            "subscriptionType": null,
            "types": all
        }}
    }))
    .expect("fixture schema should load")
}

/// Collects every `field {` opener in a selection body as `field` names in order.
fn expanded_fields(selection: &str) -> Vec<String> {
    let tokens: Vec<&str> = selection.split_whitespace().collect();
    tokens
        .windows(2)
        .filter(|w| w[1] == "{")
        .map(|w| w[0].to_string())
        .collect()
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn test_two_type_cycle_terminates() {
    let reg = schema(vec![
        object(
            "A",
            vec![field("id", named("SCALAR", "ID")), field("b", named("OBJECT", "B"))],
        ),
        object(
            "B",
            vec![field("id", named("SCALAR", "ID")), field("a", named("OBJECT", "A"))],
        ),
    ]);

    let selection = reg.default_selection("A").unwrap();
    assert_eq!(selection, "id b { id a { id } }");
}

#[test]
fn test_no_pair_expands_twice() {
    let reg = schema(vec![
        object(
            "A",
            vec![
                field("id", named("SCALAR", "ID")),
                field("b", named("OBJECT", "B")),
                field("self", named("OBJECT", "A")),
                field("bs", non_null(list(non_null(named("OBJECT", "B"))))),
            ],
        ),
        object(
            "B",
            vec![
                field("name", named("SCALAR", "String")),
                field("a", named("OBJECT", "A")),
                field("b", named("OBJECT", "B")),
            ],
        ),
    ]);

    let selection = reg.default_selection("A").unwrap();

    // field names are unique per resolved type in this fixture, so counting
    // openers per name counts expansions per (field, type) pair
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in expanded_fields(&selection) {
        *counts.entry(name).or_default() += 1;
    }
    assert!(counts.values().all(|&c| c == 1), "repeated expansion in {selection}");
    assert_eq!(selection.matches('{').count(), selection.matches('}').count());
}

#[test]
fn test_self_reference_terminates() {
    let reg = schema(vec![
        object(
            "A",
            vec![field("id", named("SCALAR", "ID"))],
        ),
        object(
            "Node",
            vec![
                field("id", named("SCALAR", "ID")),
                field("parent", named("OBJECT", "Node")),
                field("children", list(named("OBJECT", "Node"))),
            ],
        ),
    ]);

    assert_eq!(
        reg.default_selection("Node").unwrap(),
        "id parent { id children { id } }"
    );
}

// =============================================================================
// Memo scope
// =============================================================================

#[test]
fn test_pair_expanded_earlier_is_dropped_from_sibling_branch() {
    let reg = schema(vec![
        object("A", vec![field("id", named("SCALAR", "ID"))]),
        object("User", vec![field("id", named("SCALAR", "ID"))]),
        object("Left", vec![field("owner", named("OBJECT", "User"))]),
        object(
            "Right",
            vec![
                field("owner", named("OBJECT", "User")),
                field("label", named("SCALAR", "String")),
            ],
        ),
        object(
            "Root",
            vec![
                field("left", named("OBJECT", "Left")),
                field("right", named("OBJECT", "Right")),
            ],
        ),
    ]);

    // `owner: User` was expanded under `left`, so it is silently omitted under
    // `right` even though no cycle is involved
    assert_eq!(
        reg.default_selection("Root").unwrap(),
        "left { owner { id } } right { label }"
    );
}

#[test]
fn test_same_field_name_with_different_type_expands_separately() {
    let reg = schema(vec![
        object("A", vec![field("id", named("SCALAR", "ID"))]),
        object("User", vec![field("id", named("SCALAR", "ID"))]),
        object("Team", vec![field("name", named("SCALAR", "String"))]),
        object("Left", vec![field("owner", named("OBJECT", "User"))]),
        object("Right", vec![field("owner", named("OBJECT", "Team"))]),
        object(
            "Root",
            vec![
                field("left", named("OBJECT", "Left")),
                field("right", named("OBJECT", "Right")),
            ],
        ),
    ]);

    assert_eq!(
        reg.default_selection("Root").unwrap(),
        "left { owner { id } } right { owner { name } }"
    );
}

#[test]
fn test_top_level_field_pruned_after_nested_expansion() {
    let reg = schema(vec![
        object("A", vec![field("id", named("SCALAR", "ID"))]),
        object("User", vec![field("id", named("SCALAR", "ID"))]),
        object("Left", vec![field("owner", named("OBJECT", "User"))]),
        object(
            "Root",
            vec![
                field("first", named("OBJECT", "Left")),
                field("owner", named("OBJECT", "User")),
            ],
        ),
    ]);

    assert_eq!(
        reg.default_selection("Root").unwrap(),
        "first { owner { id } }"
    );
}

#[test]
fn test_fully_pruned_branch_keeps_empty_braces() {
    let reg = schema(vec![
        object("A", vec![field("id", named("SCALAR", "ID"))]),
        object("User", vec![field("id", named("SCALAR", "ID"))]),
        object("Left", vec![field("owner", named("OBJECT", "User"))]),
        object("Solo", vec![field("owner", named("OBJECT", "User"))]),
        object(
            "Root",
            vec![
                field("first", named("OBJECT", "Left")),
                field("second", named("OBJECT", "Solo")),
            ],
        ),
    ]);

    assert_eq!(
        reg.default_selection("Root").unwrap(),
        "first { owner { id } } second {  }"
    );
}

// =============================================================================
// Classification in the walk
// =============================================================================

#[test]
fn test_meta_and_root_types_are_leaves() {
    let reg = schema(vec![object(
        "A",
        vec![
            field("id", named("SCALAR", "ID")),
            field("meta", named("OBJECT", "__Type")),
            field("root", named("OBJECT", "Query")),
            field("mut", named("OBJECT", "Mutation")),
        ],
    )]);

    assert_eq!(reg.default_selection("A").unwrap(), "id meta root mut");
    assert_eq!(reg.classify(reg.get("Query").unwrap()), TypeClass::Scalar);
}

#[test]
fn test_root_field_listing() {
    let reg = schema(vec![object("A", vec![field("id", named("SCALAR", "ID"))])]);
    let names: Vec<_> = reg
        .root_fields(OperationKind::Mutation)
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["touch"]);
}

// =============================================================================
// Load failures
// =============================================================================

#[test]
fn test_dangling_field_type_fails_load() {
    let err = SchemaRegistry::from_introspection_value(json!({
        "data": { "__schema": {
            "queryType": { "name": "Query" },
            "types": [object("Query", vec![field("user", named("OBJECT", "User"))])]
        }}
    }))
    .unwrap_err();

    assert!(matches!(err, SchemaError::TypeNotFound { ref name } if name == "User"));
}

#[test]
fn test_non_json_fails_load() {
    let err = SchemaRegistry::from_introspection_str("not json").unwrap_err();
    assert!(matches!(err, SchemaError::Json(_)));
}
