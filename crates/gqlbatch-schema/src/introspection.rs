//! Introspection payload decoding.
//!
//! The server answers [`INTROSPECTION_QUERY`] with a loosely typed JSON tree.
//! This module deserializes it into private raw records and validates them
//! eagerly into the strict model in [`crate::types`]. Anything that does not
//! fit (unknown kinds, unnamed named types, truncated wrapper chains) is
//! rejected here so later stages never see undefined fields.

use serde::Deserialize;

use crate::error::SchemaError;
use crate::types::{EnumValue, FieldData, InputValue, TypeData, TypeKind, TypeRef};
use crate::Result;

/// Number of nested `ofType` levels the `TypeRef` fragment requests.
///
/// A wrapper found at this depth has an inner type the payload cannot carry,
/// so it is rejected with [`SchemaError::UnsupportedDepth`].
pub const MAX_WRAPPER_DEPTH: usize = 7;

/// The canonical introspection document used to fetch a schema.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct RawResponse {
    data: Option<RawData>,
    #[serde(default)]
    errors: Option<Vec<RawError>>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawData {
    #[serde(rename = "__schema")]
    schema: Option<RawSchema>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    query_type: Option<RawRootRef>,
    mutation_type: Option<RawRootRef>,
    subscription_type: Option<RawRootRef>,
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
struct RawRootRef {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawType {
    kind: String,
    name: Option<String>,
    description: Option<String>,
    fields: Option<Vec<RawField>>,
    input_fields: Option<Vec<RawInputValue>>,
    enum_values: Option<Vec<RawEnumValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    description: Option<String>,
    #[serde(default)]
    args: Vec<RawInputValue>,
    #[serde(rename = "type")]
    type_ref: RawTypeRef,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    type_ref: RawTypeRef,
    default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnumValue {
    name: String,
    description: Option<String>,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeRef {
    kind: String,
    name: Option<String>,
    of_type: Option<Box<RawTypeRef>>,
}

/// A validated introspection result, ready to become a registry.
#[derive(Debug)]
pub(crate) struct DecodedSchema {
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub types: Vec<TypeData>,
}

/// Decodes a full introspection response (`{ data: { __schema: .. } }`).
pub(crate) fn decode(value: serde_json::Value) -> Result<DecodedSchema> {
    let raw: RawResponse = serde_json::from_value(value)?;

    let Some(schema) = raw.data.and_then(|d| d.schema) else {
        let detail = raw
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(if detail.is_empty() {
            SchemaError::malformed("response has no data.__schema")
        } else {
            SchemaError::malformed(format!("response has no data.__schema: {detail}"))
        });
    };

    let query_type = schema
        .query_type
        .ok_or_else(|| SchemaError::malformed("__schema.queryType is missing"))?
        .name;

    let types = schema
        .types
        .into_iter()
        .map(convert_type)
        .collect::<Result<Vec<_>>>()?;

    Ok(DecodedSchema {
        query_type,
        mutation_type: schema.mutation_type.map(|r| r.name),
        subscription_type: schema.subscription_type.map(|r| r.name),
        types,
    })
}

fn convert_type(raw: RawType) -> Result<TypeData> {
    let kind: TypeKind = raw.kind.parse()?;
    if kind.is_wrapper() {
        return Err(SchemaError::malformed(format!(
            "schema type list contains a {kind} wrapper"
        )));
    }
    let name = raw
        .name
        .ok_or_else(|| SchemaError::malformed(format!("{kind} type without a name")))?;

    let fields = raw
        .fields
        .map(|fields| fields.into_iter().map(convert_field).collect::<Result<Vec<_>>>())
        .transpose()?;
    let input_fields = raw
        .input_fields
        .map(|fields| {
            fields
                .into_iter()
                .map(convert_input_value)
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;
    let enum_values = raw.enum_values.map(|values| {
        values
            .into_iter()
            .map(|v| EnumValue {
                name: v.name,
                description: v.description,
                is_deprecated: v.is_deprecated,
                deprecation_reason: v.deprecation_reason,
            })
            .collect()
    });

    Ok(TypeData {
        kind,
        name,
        description: raw.description,
        fields,
        input_fields,
        enum_values,
    })
}

fn convert_field(raw: RawField) -> Result<FieldData> {
    Ok(FieldData {
        name: raw.name,
        description: raw.description,
        args: raw
            .args
            .into_iter()
            .map(convert_input_value)
            .collect::<Result<Vec<_>>>()?,
        type_ref: convert_type_ref(raw.type_ref, 0)?,
        is_deprecated: raw.is_deprecated,
        deprecation_reason: raw.deprecation_reason,
    })
}

fn convert_input_value(raw: RawInputValue) -> Result<InputValue> {
    Ok(InputValue {
        name: raw.name,
        description: raw.description,
        type_ref: convert_type_ref(raw.type_ref, 0)?,
        default_value: raw.default_value,
    })
}

/// Converts one wrapper chain; `depth` counts the `ofType` levels consumed.
fn convert_type_ref(raw: RawTypeRef, depth: usize) -> Result<TypeRef> {
    let kind: TypeKind = raw.kind.parse()?;
    if !kind.is_wrapper() {
        let name = raw
            .name
            .ok_or_else(|| SchemaError::malformed(format!("{kind} reference without a name")))?;
        return Ok(TypeRef::Named { kind, name });
    }

    if depth >= MAX_WRAPPER_DEPTH {
        return Err(SchemaError::UnsupportedDepth {
            max_depth: MAX_WRAPPER_DEPTH,
        });
    }
    let inner = raw
        .of_type
        .ok_or_else(|| SchemaError::malformed(format!("{kind} reference without ofType")))?;
    let inner = convert_type_ref(*inner, depth + 1)?;

    Ok(match kind {
        TypeKind::List => TypeRef::list(inner),
        _ => TypeRef::non_null(inner),
    })
}
