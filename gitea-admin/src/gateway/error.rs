//! Error types for gateway calls
//!
//! This module defines the failures that can occur when talking to the Gitea
//! API: transport problems, undecodable bodies, reads that came back with an
//! unexpected status, and token loading issues.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when calling the Gitea API
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced a response (connection refused, TLS, ...)
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint the request was issued against
        endpoint: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not have the expected shape
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        /// Endpoint the response came from
        endpoint: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A read returned a non-success status
    #[error("{endpoint} returned unexpected status {status}")]
    UnexpectedStatus {
        /// Endpoint the request was issued against
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// The token file could not be read
    #[error("failed to read token file {}: {source}", path.display())]
    TokenFile {
        /// Path of the token file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The token file exists but holds no token
    #[error("token file {} is empty", .0.display())]
    EmptyToken(PathBuf),

    /// The configured base URL is not a valid absolute URL
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// A request payload could not be serialized
    #[error("failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
