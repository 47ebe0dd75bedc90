//! HTTP transport to the admin endpoint.
//!
//! # Responsibilities
//! - GET / POST / DELETE against `/config<path>`
//! - Map 404 and JSON `null` bodies to "absent", distinct from transport
//!   and server errors
//!
//! # Design Decisions
//! - Whole-subtree replace semantics: a write replaces everything at the
//!   addressed path, so callers read-modify-write the enclosing subtree
//! - No retries here; failures surface unchanged to the caller

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::tree::path;

/// Errors from the admin transport.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The endpoint was unreachable or the exchange failed mid-flight.
    #[error("admin endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("admin endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Client for the admin configuration API.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn config_url(&self, path: &str) -> String {
        format!("{}/config{}", self.base_url, path::normalize(path))
    }

    /// Read the subtree at `path`. `Ok(None)` when nothing is configured
    /// there.
    pub async fn get_config(&self, path: &str) -> Result<Option<Value>, AdminError> {
        let response = self.client.get(self.config_url(path)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        let value: Value = response.json().await?;
        Ok(if value.is_null() { None } else { Some(value) })
    }

    /// Replace the subtree at `path` with `value`.
    pub async fn put_config(&self, path: &str, value: &Value) -> Result<(), AdminError> {
        debug!(path, "writing config subtree");
        let response = self
            .client
            .post(self.config_url(path))
            .json(value)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Remove the subtree at `path`. `Ok(false)` when nothing was there.
    pub async fn delete_config(&self, path: &str) -> Result<bool, AdminError> {
        let response = self.client.delete(self.config_url(path)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(response).await?;
        Ok(true)
    }

    /// Whether anything is configured at `path`.
    pub async fn has_path(&self, path: &str) -> Result<bool, AdminError> {
        Ok(self.get_config(path).await?.is_some())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AdminError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AdminError::Status { status, body })
    }
}
