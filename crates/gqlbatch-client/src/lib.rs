//! # gqlbatch-client
//!
//! Folds many aliased root-field calls into one GraphQL document and sends
//! it in a single round trip.
//!
//! ## Overview
//!
//! - [`QueryBatch`] maps aliases to [`QueryItem`]s; insertion order is
//!   document order.
//! - [`compile_batch`] produces the operation text and the `$inputN`
//!   variables map.
//! - [`QueryExecutor`] posts the compiled document through a [`Transport`]
//!   under a deadline (3000 ms by default). Non-2xx/3xx statuses become
//!   [`ClientError::BadResponse`]; GraphQL `errors` are handed back with the
//!   data.
//! - [`OperationBuilder`] checks calls against a
//!   [`SchemaRegistry`](gqlbatch_schema::SchemaRegistry) and fills in
//!   argument types and default selection sets.
//!
//! ## Example
//!
//! ```ignore
//! use gqlbatch_client::{ClientConfig, OperationKind, QueryBatch, QueryExecutor, QueryItem};
//!
//! let executor = QueryExecutor::from_config(&ClientConfig::parse("https://api.example.com/graphql")?);
//! let batch = QueryBatch::new()
//!     .with_item("a", QueryItem::new("user").typed_variable("id", "42", "ID!").with_selection("id name"))?;
//! let response = executor.execute(OperationKind::Query, &batch).await?;
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod executor;
pub mod operation;
pub mod query;
pub mod transport;

pub use compiler::{CompiledDocument, DEFAULT_VARIABLE_TYPE, OPERATION_NAME, compile_batch};
pub use config::ClientConfig;
pub use error::ClientError;
pub use executor::{DEFAULT_TIMEOUT, ErrorLocation, GraphQlError, GraphQlResponse, QueryExecutor};
pub use gqlbatch_schema::OperationKind;
pub use operation::{GraphQlQuery, OperationBuilder};
pub use query::{QueryBatch, QueryItem, VariableBinding, query_has_items};
pub use transport::{Headers, HttpTransport, Transport, TransportResponse};

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
