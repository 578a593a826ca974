//! The wire-level request/response envelope (§6.2): plain serde DTOs a host
//! transport decodes a request into and serializes a response from.
//!
//! Turning `GraphQLRequest::query` into a [`crate::ast::Document`] is a
//! parser's job, out of scope for this crate; a host wires this module
//! together with a parser and [`crate::executor::execute_sync`] itself.

use serde::{Deserialize, Serialize, Serializer};

use crate::{
    ast::InputValue,
    executor::{ExecutionResult, GraphQLError, Variables},
};

/// The decoded shape of an incoming GraphQL-over-HTTP request, for either a
/// JSON POST body or a GET query string assembled by the host.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GraphQLRequest {
    /// The query document source text.
    pub query: String,
    /// The operation to run, when the document defines more than one.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,
    /// Raw variable values, as a JSON-like object literal.
    pub variables: Option<InputValue>,
}

impl GraphQLRequest {
    /// Builds a request from its parts.
    pub fn new(query: String, operation_name: Option<String>, variables: Option<InputValue>) -> Self {
        GraphQLRequest {
            query,
            operation_name,
            variables,
        }
    }

    /// The operation name, if one was given.
    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    /// The request's variables, flattened into the map
    /// [`crate::executor::execute_sync`] expects — empty if none were given
    /// or `variables` wasn't an object literal.
    pub fn variables(&self) -> Variables {
        self.variables
            .as_ref()
            .and_then(|iv| iv.to_object_value())
            .map(|o| o.into_iter().map(|(k, v)| (k.to_owned(), v.clone())).collect())
            .unwrap_or_default()
    }
}

/// Wraps the outcome of executing one request so it serializes directly as
/// the GraphQL response envelope (§6.2, §7): `{"data": ..., "errors": [...]}`
/// on a successful operation selection, or just `{"errors": [...]}` when the
/// request itself couldn't be executed (unknown operation, bad variables).
pub struct GraphQLResponse(pub Result<ExecutionResult, GraphQLError>);

impl GraphQLResponse {
    /// Wraps an execution outcome.
    pub fn new(result: Result<ExecutionResult, GraphQLError>) -> Self {
        GraphQLResponse(result)
    }

    /// Whether the request executed at all (a request-level failure, not the
    /// presence of field errors, is what flips this to `false` — a host uses
    /// this to decide between a `200` and a `400` status code).
    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }
}

impl Serialize for GraphQLResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        match &self.0 {
            Ok(result) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("data", &result.data)?;
                if !result.errors.is_empty() {
                    map.serialize_entry("errors", &result.errors)?;
                }
                map.end()
            }
            Err(err) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("errors", &[err])?;
                map.end()
            }
        }
    }
}
