//! HTTP client for a JSON `/tasks` resource.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::RemoteError;
use super::{RemoteResult, TaskStore};
use crate::config::BoardConfig;
use crate::types::{Card, CardId, NewCard, TaskPatch};

/// Default task store URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Extract a human-readable message from a JSON error body.
///
/// Tries `message`, then `error`, then falls back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(err) = json.get("error").and_then(|v| v.as_str()) {
            return err.to_string();
        }
    }
    body.to_string()
}

/// Decode listing entries one by one, skipping any that are not task records.
fn records_to_cards(records: Vec<serde_json::Value>) -> Vec<Card> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Card>(record.clone()) {
            Ok(card) => Some(card),
            Err(error) => {
                warn!(%error, %record, "skipping undecodable task record");
                None
            }
        })
        .collect()
}

/// Task store reached over HTTP.
pub struct HttpTaskStore {
    client: Client,
    base_url: String,
}

impl HttpTaskStore {
    /// Create a client for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> RemoteResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &BoardConfig) -> RemoteResult<Self> {
        Self::with_timeout(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: &CardId) -> String {
        format!("{}/tasks/{}", self.base_url, urlencoding::encode(id.as_str()))
    }

    /// Map a non-success response to a `RemoteError`.
    async fn check_response(response: Response) -> RemoteResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::status(
            status.as_u16(),
            extract_error_message(&body),
        ))
    }

    /// Decode a JSON body, treating an empty body as missing.
    async fn decode<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(RemoteError::MissingBody);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list_tasks(&self) -> RemoteResult<Vec<Card>> {
        let url = self.tasks_url();
        debug!(%url, "listing tasks");
        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;
        let records: Vec<serde_json::Value> = Self::decode(response).await?;
        Ok(records_to_cards(records))
    }

    async fn create_task(&self, card: &NewCard) -> RemoteResult<Card> {
        let url = self.tasks_url();
        debug!(%url, title = %card.title, "creating task");
        let response = self.client.post(&url).json(card).send().await?;
        let response = Self::check_response(response).await?;
        Self::decode(response).await
    }

    async fn update_task(&self, id: &CardId, patch: &TaskPatch) -> RemoteResult<()> {
        let url = self.task_url(id);
        debug!(%url, "updating task");
        let response = self.client.put(&url).json(patch).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete_task(&self, id: &CardId) -> RemoteResult<()> {
        let url = self.task_url(id);
        debug!(%url, "deleting task");
        let response = self.client.delete(&url).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }
}
