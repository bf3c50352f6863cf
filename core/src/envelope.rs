//! Response envelope handling.
//!
//! # Design
//! The console API answers some endpoints with `{"data": payload}` and others
//! with the bare payload. `Envelope<T>` models both shapes as a sum type for
//! typed deserialization; `normalize` does the same job over an untyped
//! `serde_json::Value` and borrows instead of copying.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A response payload that may or may not be wrapped in a `data` field.
///
/// Deserialization tries the wrapped shape first, so `{"data": ...}` whose
/// inner value fits `T` becomes `Wrapped`; anything else that fits `T` is
/// `Bare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Envelope::Wrapped { .. })
    }
}

/// Extract the payload from `response`.
///
/// Returns the `data` member when `response` is an object that has one and,
/// if `expect_array` is set, that member is an array. Otherwise `response`
/// itself is the payload.
pub fn normalize(response: &Value, expect_array: bool) -> &Value {
    match response.get("data") {
        Some(data) if !expect_array || data.is_array() => data,
        _ => response,
    }
}
