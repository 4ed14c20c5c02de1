use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::REQUEST_TIMEOUT;
use crate::domain::{UserId, ViewerRole};
use crate::io::RecordSet;

/// Paths the backend serves a viewer's appointments and payments from.
/// Scoping by role happens here, before records reach the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEndpoints {
    pub appointments: String,
    pub payments: String,
}

impl RecordEndpoints {
    pub fn for_viewer(role: ViewerRole, viewer_id: Option<UserId>) -> Option<Self> {
        match (role, viewer_id) {
            (ViewerRole::Admin, _) => Some(Self {
                appointments: "/appointments".to_string(),
                payments: "/payments".to_string(),
            }),
            (ViewerRole::Psychologist, Some(id)) => Some(Self {
                appointments: format!("/appointments/psychologist/{id}"),
                payments: format!("/payments/psychologist/{id}"),
            }),
            (ViewerRole::Patient, Some(id)) => Some(Self {
                appointments: format!("/appointments/patient/{id}"),
                payments: format!("/payments/patient/{id}"),
            }),
            (_, None) => None,
        }
    }
}

/// HTTP client for the clinic's REST backend.
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON array. A `null` body reads as an empty collection.
    async fn get_collection(&self, path: &str) -> Result<Vec<Value>> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Cannot reach backend at {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{} {}: {}", status.as_u16(), path, error_message(status, &body));
        }

        let body: Option<Vec<Value>> = response
            .json()
            .await
            .with_context(|| format!("Unexpected response body from {path}"))?;
        let values = body.unwrap_or_default();
        tracing::info!(path, count = values.len(), "fetched records");
        Ok(values)
    }

    /// Fetch the viewer's appointments and payments concurrently.
    pub async fn fetch_records(&self, endpoints: &RecordEndpoints) -> Result<RecordSet> {
        let (appointments, payments) = tokio::try_join!(
            self.get_collection(&endpoints.appointments),
            self.get_collection(&endpoints.payments),
        )?;
        Ok(RecordSet::from_values(appointments, payments))
    }

    /// Returns true if the backend answers its diagnostics endpoint.
    pub async fn health_check(&self) -> bool {
        let url = self.url("/test-data");
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "backend health check failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "backend unavailable");
                false
            }
        }
    }
}

/// Pull the most useful message out of an error body: the backend answers
/// with `{"message": ...}` or `{"error": ...}`, otherwise use the raw text.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Server error")
            .to_string()
    } else {
        body.trim().to_string()
    }
}
