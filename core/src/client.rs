//! Stateless HTTP request builder and response parser for the console API.
//!
//! # Design
//! `ConsoleClient` holds only a `base_url` and an optional bearer token and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller executes the actual HTTP round-trip.
//!
//! CRUD is generic over `Resource`, so `build_list::<Employee>()` and
//! `build_list::<Region>()` share one code path. Every built request carries
//! the timeout selected for it, and list bodies go through `normalize`
//! because the server mixes enveloped and bare shapes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::envelope::{normalize, Envelope};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::timeout::TimeoutTier;
use crate::types::{
    BulkAssignment, IncentiveRow, RefreshRequest, ReportQuery, Resource, StoreAssignment,
    TokenPair, TransactionUpload, UploadSummary,
};

/// Synchronous, stateless client for the console API.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    base_url: String,
    access_token: Option<String>,
}

impl ConsoleClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(&config.base_url);
        match &config.access_token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        }
    }

    /// Attach `authorization: Bearer <token>` to every request built from now on.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Generic CRUD
    // -----------------------------------------------------------------------

    pub fn build_list<R: Resource>(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.collection_url::<R>(), None)
    }

    pub fn build_get<R: Resource>(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, self.record_url::<R>(id), None)
    }

    pub fn build_create<R: Resource>(&self, input: &R::New) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, self.collection_url::<R>(), input)
    }

    pub fn build_update<R: Resource>(&self, id: Uuid, input: &R::Patch) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, self.record_url::<R>(id), input)
    }

    pub fn build_delete<R: Resource>(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, self.record_url::<R>(id), None)
    }

    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        check_status(&response, 200)?;
        decode_list(&response.body)
    }

    pub fn parse_get<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response, 200)?;
        decode_one(&response.body)
    }

    pub fn parse_create<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response, 201)?;
        decode_one(&response.body)
    }

    pub fn parse_update<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response, 200)?;
        decode_one(&response.body)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // -----------------------------------------------------------------------
    // Bulk and upload
    // -----------------------------------------------------------------------

    pub fn build_bulk_assign_stores(&self, input: &BulkAssignment) -> Result<HttpRequest, ApiError> {
        let path = format!("{}/bulk", self.collection_url::<StoreAssignment>());
        self.json_request(HttpMethod::Post, path, input)
    }

    pub fn parse_bulk_assign_stores(&self, response: HttpResponse) -> Result<Vec<StoreAssignment>, ApiError> {
        check_status(&response, 201)?;
        decode_list(&response.body)
    }

    pub fn build_upload_transactions(&self, input: &TransactionUpload) -> Result<HttpRequest, ApiError> {
        let path = format!("{}/transactions/upload", self.base_url);
        self.json_request(HttpMethod::Post, path, input)
    }

    pub fn parse_upload_transactions(&self, response: HttpResponse) -> Result<UploadSummary, ApiError> {
        check_status(&response, 201)?;
        decode_one(&response.body)
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    pub fn build_incentive_report(&self, query: &ReportQuery) -> HttpRequest {
        let path = format!("{}/reports/incentives?{}", self.base_url, report_query(query));
        self.request(HttpMethod::Get, path, None)
    }

    pub fn parse_incentive_report(&self, response: HttpResponse) -> Result<Vec<IncentiveRow>, ApiError> {
        check_status(&response, 200)?;
        decode_list(&response.body)
    }

    pub fn build_export_incentive_report(&self, query: &ReportQuery) -> HttpRequest {
        let path = format!("{}/reports/incentives/export?{}", self.base_url, report_query(query));
        self.request(HttpMethod::Get, path, None)
    }

    /// The export is CSV text and is returned verbatim.
    pub fn parse_export_incentive_report(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, 200)?;
        Ok(response.body)
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    pub fn build_refresh_token(&self, input: &RefreshRequest) -> Result<HttpRequest, ApiError> {
        let path = format!("{}/auth/refresh-token", self.base_url);
        self.json_request(HttpMethod::Post, path, input)
    }

    pub fn parse_refresh_token(&self, response: HttpResponse) -> Result<TokenPair, ApiError> {
        check_status(&response, 200)?;
        decode_one(&response.body)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn collection_url<R: Resource>(&self) -> String {
        format!("{}/{}", self.base_url, R::PATH)
    }

    fn record_url<R: Resource>(&self, id: Uuid) -> String {
        format!("{}/{}/{id}", self.base_url, R::PATH)
    }

    fn json_request<B: Serialize>(&self, method: HttpMethod, path: String, input: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(method, path, Some(body)))
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = &self.access_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        let target = path.strip_prefix(&self.base_url).unwrap_or(&path);
        let tier = TimeoutTier::classify(method, target, body.as_deref());
        debug!(%method, %path, tier = tier.name(), timeout_ms = tier.millis(), "built request");
        HttpRequest {
            method,
            path,
            headers,
            body,
            timeout_ms: tier.millis(),
        }
    }
}

fn report_query(query: &ReportQuery) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("period", &query.period);
    if let Some(region_id) = query.region_id {
        serializer.append_pair("region_id", &region_id.to_string());
    }
    serializer.finish()
}

/// Decode a list body that may be enveloped or bare.
fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Vec::<T>::deserialize(normalize(&value, true)).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Decode a single-object body that may be enveloped or bare.
fn decode_one<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    warn!(status = response.status, expected, "unexpected response status");
    match response.status {
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
