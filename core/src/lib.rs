//! Synchronous API client core for the business administration console.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `ConsoleClient` is stateless: it holds only `base_url` and an optional
//!   bearer token.
//! - Every built request carries a timeout picked by `timeout::select_timeout`
//!   from its URL, method and body size.
//! - Responses may arrive enveloped (`{"data": ...}`) or bare; `envelope`
//!   normalizes both.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod timeout;
pub mod types;

pub use client::ConsoleClient;
pub use config::ClientConfig;
pub use envelope::{normalize, Envelope};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use timeout::{select_timeout, TimeoutTier};
pub use types::*;
