//! Query execution.
//!
//! [`QueryExecutor`] compiles a batch, hands `{query, variables}` to its
//! [`Transport`] and races the call against a deadline. When the deadline
//! wins, the transport future is dropped, which cancels the in-flight
//! request. There is no queue and no retry: one call to
//! [`QueryExecutor::execute`] is at most one transport call.

use std::time::Duration;

use gqlbatch_schema::{INTROSPECTION_QUERY, OperationKind, SchemaRegistry};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::compiler::compile_batch;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::query::QueryBatch;
use crate::transport::{Headers, HttpTransport, Transport};
use crate::Result;

/// Deadline applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// The JSON body posted to the endpoint.
#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Option<&'a IndexMap<String, Value>>,
}

/// Location of a GraphQL error in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// One entry of a response's `errors` array.
///
/// Keys other than the well-known ones are kept in `extra`, so an entry
/// serializes back to what the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Empty when the server omitted it.
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A GraphQL response, returned unmodified.
///
/// `errors` next to non-null `data` is partial success, not a failure;
/// callers inspect both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse<D = Value> {
    pub data: Option<D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQlError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl<D> GraphQlResponse<D> {
    /// `true` if the response carries a non-empty `errors` array.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// `true` if the response carries both data and errors.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.data.is_some() && self.has_errors()
    }

    /// The error entries, empty when there are none.
    #[must_use]
    pub fn errors(&self) -> &[GraphQlError] {
        self.errors.as_deref().unwrap_or_default()
    }
}

/// Executes batches through a transport under a fixed deadline.
#[derive(Debug, Clone)]
pub struct QueryExecutor<T> {
    transport: T,
    timeout: Duration,
}

impl QueryExecutor<HttpTransport> {
    /// An HTTP executor for the configured endpoint.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(HttpTransport::from_config(config)).with_timeout(config.timeout())
    }
}

impl<T: Transport> QueryExecutor<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Compiles and sends `batch` as one operation of kind `kind`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Timeout`] if the transport does not settle in time
    /// - [`ClientError::BadResponse`] for HTTP status 400 and above
    /// - [`ClientError::InvalidResponse`] if the body is not a GraphQL response
    /// - whatever the transport itself fails with
    pub async fn execute(&self, kind: OperationKind, batch: &QueryBatch) -> Result<GraphQlResponse> {
        self.execute_with_headers(kind, batch, &Headers::new()).await
    }

    /// [`Self::execute`] with extra headers for this request only.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn execute_with_headers(
        &self,
        kind: OperationKind,
        batch: &QueryBatch,
        headers: &Headers,
    ) -> Result<GraphQlResponse> {
        self.execute_as(kind, batch, headers).await
    }

    /// [`Self::execute_with_headers`], decoding `data` into `D`.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`]; a `data` shape that does not fit `D` is an
    /// [`ClientError::InvalidResponse`].
    pub async fn execute_as<D: DeserializeOwned>(
        &self,
        kind: OperationKind,
        batch: &QueryBatch,
        headers: &Headers,
    ) -> Result<GraphQlResponse<D>> {
        let document = compile_batch(kind, batch);
        let request = GraphQlRequest {
            query: &document.query,
            variables: Some(&document.variables),
        };
        let body = self.post(encode_request(&request)?, headers).await?;
        let response: GraphQlResponse<D> = serde_json::from_str(&body)?;

        if response.has_errors() {
            tracing::debug!(
                operation = %kind,
                errors = response.errors().len(),
                partial = response.is_partial(),
                "GraphQL response carries errors"
            );
        }
        Ok(response)
    }

    /// Sends the introspection query and returns the raw response JSON.
    ///
    /// # Errors
    ///
    /// Same transport-level errors as [`Self::execute`].
    pub async fn introspect(&self, headers: &Headers) -> Result<Value> {
        let request = GraphQlRequest {
            query: INTROSPECTION_QUERY,
            variables: None,
        };
        let body = self.post(encode_request(&request)?, headers).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Introspects the server and loads its type graph.
    ///
    /// # Errors
    ///
    /// Transport-level errors as for [`Self::execute`], or
    /// [`ClientError::Schema`] if the payload fails validation.
    pub async fn fetch_schema(&self, headers: &Headers) -> Result<SchemaRegistry> {
        let value = self.introspect(headers).await?;
        Ok(SchemaRegistry::from_introspection_value(value)?)
    }

    /// One deadline-bounded round trip, returning the body of a non-error
    /// response.
    async fn post(&self, body: String, headers: &Headers) -> Result<String> {
        let response = tokio::time::timeout(self.timeout, self.transport.send(body, headers))
            .await
            .map_err(|_| {
                tracing::warn!(timeout = ?self.timeout, "GraphQL request timed out");
                ClientError::Timeout {
                    timeout: self.timeout,
                }
            })??;

        if response.is_error() {
            tracing::warn!(status = response.status, "Bad response from GraphQL server");
            return Err(ClientError::bad_response(response.status, response.body));
        }
        Ok(response.body)
    }
}

/// Serializes an outgoing body. Failures here are never response errors.
fn encode_request<R: Serialize>(request: &R) -> Result<String> {
    serde_json::to_string(request).map_err(ClientError::InvalidRequest)
}
