//! # Report API
//!
//! The editors persist through [`ReportApi`], an opaque create/update pair.
//! [`HttpReportApi`] talks to the dashboarding backend's REST endpoints;
//! tests and offline hosts substitute their own implementation.
//!
//! Existing reports are found through [`ReportLookup`]. [`ReportStore`] is the
//! in-memory implementation hosts keep current from save responses.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::errors::ReportResult;
use crate::report::{ReportObject, ReportPayload, ResourceKind};

/// Path of the report collection endpoint
pub const REPORT_ENDPOINT: &str = "/api/v1/report/";

/// A failed report API call, reduced to something displayable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status, when the server answered at all
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    /// Build from an error response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError {
            status: Some(status),
            message: client_error_message(status, body),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Extract a displayable message from an error response.
///
/// Tries, in order: JSON `message` (string, or object rendered as JSON),
/// JSON `error`, the raw body, and finally the status text.
pub fn client_error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        match map.get("message") {
            Some(Value::String(message)) if !message.is_empty() => return message.clone(),
            Some(value @ (Value::Object(_) | Value::Array(_))) => return value.to_string(),
            _ => {}
        }
        if let Some(Value::String(error)) = map.get("error") {
            if !error.is_empty() {
                return error.clone();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Backend persistence for reports.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Create a new report
    async fn create_report(&self, payload: &ReportPayload) -> Result<ReportObject, ApiError>;

    /// Replace report `id`
    async fn update_report(&self, id: i64, payload: &ReportPayload)
        -> Result<ReportObject, ApiError>;
}

/// Finds the report currently attached to a chart or dashboard.
pub trait ReportLookup {
    fn report_for(&self, kind: ResourceKind, id: i64) -> Option<ReportObject>;
}

/// In-memory report lookup keyed by resource.
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    reports: HashMap<(ResourceKind, i64), ReportObject>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the report attached to a resource, replacing any previous one
    pub fn insert(&mut self, kind: ResourceKind, id: i64, report: ReportObject) {
        self.reports.insert((kind, id), report);
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl ReportLookup for ReportStore {
    fn report_for(&self, kind: ResourceKind, id: i64) -> Option<ReportObject> {
        self.reports.get(&(kind, id)).cloned()
    }
}

/// Response envelope of create/update calls
#[derive(Deserialize)]
struct SaveResponse {
    id: Option<i64>,
    #[serde(default)]
    result: ReportObject,
}

/// [`ReportApi`] over the backend's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpReportApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReportApi {
    pub fn new(config: &ApiConfig) -> ReportResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("report-forms/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(HttpReportApi {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, REPORT_ENDPOINT)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}{}{}", self.base_url, REPORT_ENDPOINT, id)
    }

    async fn decode(response: reqwest::Response) -> Result<ReportObject, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        let parsed: SaveResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::new(Some(status.as_u16()), format!("Unexpected response: {}", e))
        })?;
        let mut report = parsed.result;
        if parsed.id.is_some() {
            report.id = parsed.id;
        }
        Ok(report)
    }
}

#[async_trait]
impl ReportApi for HttpReportApi {
    async fn create_report(&self, payload: &ReportPayload) -> Result<ReportObject, ApiError> {
        tracing::debug!(url = %self.collection_url(), "POST report");
        let response = self
            .client
            .post(self.collection_url())
            .json(payload)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_report(
        &self,
        id: i64,
        payload: &ReportPayload,
    ) -> Result<ReportObject, ApiError> {
        tracing::debug!(url = %self.item_url(id), "PUT report");
        let response = self
            .client
            .put(self.item_url(id))
            .json(payload)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_string() {
        let body = r#"{"message": "Name must be unique"}"#;
        assert_eq!(client_error_message(422, body), "Name must be unique");
    }

    #[test]
    fn test_message_from_json_object() {
        let body = r#"{"message": {"crontab": ["Invalid"]}}"#;
        assert_eq!(client_error_message(400, body), r#"{"crontab":["Invalid"]}"#);
    }

    #[test]
    fn test_message_from_error_key_and_raw_body() {
        assert_eq!(client_error_message(500, r#"{"error": "db down"}"#), "db down");
        assert_eq!(client_error_message(502, "  bad gateway  "), "bad gateway");
    }

    #[test]
    fn test_message_falls_back_to_status() {
        assert_eq!(client_error_message(404, ""), "Not Found");
        assert_eq!(ApiError::from_response(403, "").to_string(), "Forbidden");
    }

    #[test]
    fn test_store_lookup() {
        let mut store = ReportStore::new();
        assert!(store.report_for(ResourceKind::Chart, 1).is_none());
        let report = ReportObject {
            id: Some(9),
            ..ReportObject::default()
        };
        store.insert(ResourceKind::Chart, 1, report.clone());
        assert_eq!(store.report_for(ResourceKind::Chart, 1), Some(report));
        assert!(store.report_for(ResourceKind::Dashboard, 1).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let api = HttpReportApi::new(&ApiConfig {
            base_url: "http://bi.local/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(api.collection_url(), "http://bi.local/api/v1/report/");
        assert_eq!(api.item_url(4), "http://bi.local/api/v1/report/4");
    }
}
