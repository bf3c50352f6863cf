//! Error types for the console API client.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because callers act on
//! them (show "no such record", trigger a token refresh). All other unexpected
//! statuses land in `HttpError` with the raw status code and body.

use thiserror::Error;

/// Errors returned by `ConsoleClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned 401; the access token is missing or expired.
    #[error("unauthorized")]
    Unauthorized,

    /// The server returned a status other than the expected one, 401 or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A method name that is not one of GET, POST, PUT, PATCH, DELETE.
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),
}
