//! Remote gateway to the Gitea REST API
//!
//! Everything above this module talks to Gitea through the [`Gateway`] trait:
//! one method per HTTP verb, each taking an endpoint relative to the API base
//! (e.g. `orgs/acme/teams`) and returning the status code together with the
//! decoded JSON body. Endpoints are unencoded: every `/`-separated piece is
//! one path segment and is percent-encoded on the way out. Non-success
//! statuses are *not* errors at this level; callers decide what a given
//! status means for their operation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub mod error;
pub mod http;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{GatewayError, GatewayResult};
pub use http::{create_access_token, HttpGateway};

/// HTTP verbs issued by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// Status code and decoded body of a gateway call
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body; `Null` for empty bodies, a string for non-JSON bodies
    pub body: Value,
}

impl GatewayResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Decode the body into a typed record
    pub fn json<T: DeserializeOwned>(&self, endpoint: &str) -> GatewayResult<T> {
        serde_json::from_value(self.body.clone()).map_err(|source| GatewayError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Decode the body of a read, treating any status but `expected` as an error
    pub fn expect_json<T: DeserializeOwned>(&self, endpoint: &str, expected: u16) -> GatewayResult<T> {
        if self.status != expected {
            return Err(GatewayError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: self.status,
            });
        }
        self.json(endpoint)
    }
}

/// Trait for the transport underneath every remote operation
///
/// Implementations attach authentication and resolve endpoints against the
/// API base URL. Calls are issued one at a time by the callers; nothing in
/// the crate issues two calls concurrently.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// GET an endpoint with query parameters
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> GatewayResult<GatewayResponse>;

    /// POST a JSON payload
    async fn post(&self, endpoint: &str, body: &Value) -> GatewayResult<GatewayResponse>;

    /// PATCH with a JSON payload
    async fn patch(&self, endpoint: &str, body: &Value) -> GatewayResult<GatewayResponse>;

    /// PUT without a payload
    async fn put(&self, endpoint: &str) -> GatewayResult<GatewayResponse>;

    /// DELETE an endpoint
    async fn delete(&self, endpoint: &str) -> GatewayResult<GatewayResponse>;
}

/// Serialize a typed request record into a JSON payload
pub fn payload<T: Serialize>(request: &T) -> GatewayResult<Value> {
    serde_json::to_value(request).map_err(GatewayError::Encode)
}

/// Whether a DELETE status means the resource is gone
pub fn is_deleted(status: u16) -> bool {
    status == 204 || status == 200
}
