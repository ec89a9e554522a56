//! # gqlbatch-schema
//!
//! The introspected type graph of a GraphQL server, and the default
//! selection sets derived from it.
//!
//! ## Overview
//!
//! - [`SchemaRegistry`] is populated once from an introspection response
//!   (fetched with [`INTROSPECTION_QUERY`]) and is read-only afterwards.
//!   Payloads are validated eagerly: unknown kinds, dangling type names and
//!   wrapper chains deeper than [`MAX_WRAPPER_DEPTH`] are rejected at load.
//! - The [`resolver`] functions unwrap list / non-null chains and classify
//!   named types as object-like, enum-like or scalar.
//! - [`SelectionSynthesizer`] walks a composite type and emits a selection
//!   body covering every reachable leaf, terminating on cyclic schemas.
//!
//! ## Example
//!
//! ```ignore
//! use gqlbatch_schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::from_introspection_str(&body)?;
//! let selection = registry.default_selection("User")?;
//! // "id name friends { id name }"
//! ```

pub mod error;
pub mod introspection;
pub mod registry;
pub mod resolver;
pub mod selection;
pub mod types;

pub use error::SchemaError;
pub use introspection::{INTROSPECTION_QUERY, MAX_WRAPPER_DEPTH};
pub use registry::SchemaRegistry;
pub use resolver::{TypeClass, is_list, is_required, unwrap_to_named};
pub use selection::{SelectionMemo, SelectionSynthesizer, synthesize_selection_set};
pub use types::{EnumValue, FieldData, InputValue, OperationKind, TypeData, TypeKind, TypeRef};

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
