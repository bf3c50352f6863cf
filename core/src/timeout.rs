//! Per-request timeout selection.
//!
//! Classifies a request into one of five tiers from its URL, method and
//! serialized body size. The rules overlap, so they are checked in a fixed
//! order and the first match wins. Enforcing the timeout is the host's job.

use std::time::Duration;

use url::{Position, Url};

use crate::http::{HttpMethod, HttpRequest};

/// Serialized bodies longer than this many characters count as large data
/// for POST and PATCH.
pub const LARGE_BODY_THRESHOLD: usize = 10_240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutTier {
    Default,
    LargeData,
    FileUpload,
    Reports,
    TokenRefresh,
}

impl TimeoutTier {
    pub const fn millis(self) -> u64 {
        match self {
            TimeoutTier::Default => 30_000,
            TimeoutTier::LargeData => 120_000,
            TimeoutTier::FileUpload => 300_000,
            TimeoutTier::Reports => 180_000,
            TimeoutTier::TokenRefresh => 15_000,
        }
    }

    pub const fn duration(self) -> Duration {
        Duration::from_millis(self.millis())
    }

    /// Pick the tier for a request. `url` is the request target without
    /// scheme or host. `body` is the canonical JSON text; its size is counted
    /// in Unicode scalar values (`char`s), not bytes or UTF-16 code units.
    ///
    /// PUT is not subject to the body size rule.
    pub fn classify(method: HttpMethod, url: &str, body: Option<&str>) -> Self {
        let url = url.to_ascii_lowercase();
        let mentions = |needles: &[&str]| needles.iter().any(|n| url.contains(n));

        if mentions(&["upload", "file"]) {
            return TimeoutTier::FileUpload;
        }
        if mentions(&["report", "export"]) {
            return TimeoutTier::Reports;
        }
        if url.contains("refresh-token") {
            return TimeoutTier::TokenRefresh;
        }
        if matches!(method, HttpMethod::Post | HttpMethod::Patch)
            && body.is_some_and(|b| b.chars().count() > LARGE_BODY_THRESHOLD)
        {
            return TimeoutTier::LargeData;
        }
        if mentions(&["bulk", "batch"]) {
            return TimeoutTier::LargeData;
        }
        TimeoutTier::Default
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeoutTier::Default => "default",
            TimeoutTier::LargeData => "large-data",
            TimeoutTier::FileUpload => "file-upload",
            TimeoutTier::Reports => "reports",
            TimeoutTier::TokenRefresh => "token-refresh",
        }
    }
}

/// Timeout in milliseconds for `request`. Never fails.
///
/// An absolute `request.path` is classified on its path and query only, so
/// the host name never picks the tier.
pub fn select_timeout(request: &HttpRequest) -> u64 {
    let target = match Url::parse(&request.path) {
        Ok(url) => url[Position::BeforePath..].to_string(),
        Err(_) => request.path.clone(),
    };
    TimeoutTier::classify(request.method, &target, request.body.as_deref()).millis()
}
