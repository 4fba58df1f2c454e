//! Remote relational backend.
//!
//! Every method is one HTTP round trip against a PostgREST-style API.
//! There is no retry and no transaction.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::mapper::{CompletionPatch, NewRemoteLog, NewRemoteTask, RemoteLog, RemoteTask};

const TASKS_TABLE: &str = "tasks";
const LOGS_TABLE: &str = "daily_logs";

/// Row-level operations on the remote tables.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All task rows, newest `created_at` first.
    async fn select_tasks(&self) -> Result<Vec<RemoteTask>>;

    /// Inserts one row and returns it as stored, with server-assigned id and timestamp.
    async fn insert_task(&self, row: &NewRemoteTask) -> Result<RemoteTask>;

    async fn update_completion(&self, id: &str, is_completed: bool) -> Result<()>;

    async fn delete_task(&self, id: &str) -> Result<()>;

    /// Up to `limit` diary rows, newest first.
    async fn select_logs(&self, limit: usize) -> Result<Vec<RemoteLog>>;

    async fn insert_log(&self, row: &NewRemoteLog) -> Result<RemoteLog>;
}

/// [`RemoteStore`] over HTTP.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base: Url,
}

impl RestStore {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| Error::Configuration(format!("access key is not a valid header: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| Error::Configuration(format!("access key is not a valid header: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base: config.url.clone(),
        })
    }

    fn table_url(&self, table: &str) -> Url {
        let path = format!("{}/rest/v1/{}", self.base.path().trim_end_matches('/'), table);
        let mut url = self.base.clone();
        url.set_path(&path);
        url.set_query(None);
        url
    }

    fn by_id(&self, builder: RequestBuilder, id: &str) -> RequestBuilder {
        builder.query(&[("id", format!("eq.{id}"))])
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn select_tasks(&self) -> Result<Vec<RemoteTask>> {
        debug!(table = TASKS_TABLE, "select");
        let request = self
            .client
            .get(self.table_url(TASKS_TABLE))
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        decode(send(request).await?).await
    }

    async fn insert_task(&self, row: &NewRemoteTask) -> Result<RemoteTask> {
        debug!(table = TASKS_TABLE, title = %row.title, "insert");
        let request = self
            .client
            .post(self.table_url(TASKS_TABLE))
            .header("Prefer", "return=representation")
            .json(&[row]);
        single(decode(send(request).await?).await?)
    }

    async fn update_completion(&self, id: &str, is_completed: bool) -> Result<()> {
        debug!(table = TASKS_TABLE, id, is_completed, "update");
        let request = self
            .by_id(self.client.patch(self.table_url(TASKS_TABLE)), id)
            .json(&CompletionPatch { is_completed });
        send(request).await?;
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        debug!(table = TASKS_TABLE, id, "delete");
        let request = self.by_id(self.client.delete(self.table_url(TASKS_TABLE)), id);
        send(request).await?;
        Ok(())
    }

    async fn select_logs(&self, limit: usize) -> Result<Vec<RemoteLog>> {
        debug!(table = LOGS_TABLE, limit, "select");
        let request = self.client.get(self.table_url(LOGS_TABLE)).query(&[
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ]);
        decode(send(request).await?).await
    }

    async fn insert_log(&self, row: &NewRemoteLog) -> Result<RemoteLog> {
        debug!(table = LOGS_TABLE, "insert");
        let request = self
            .client
            .post(self.table_url(LOGS_TABLE))
            .header("Prefer", "return=representation")
            .json(&[row]);
        single(decode(send(request).await?).await?)
    }
}

/// Sends the request. Network failures become `RemoteTransport`, non-2xx
/// answers become `RemoteQuery` carrying the response body.
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    Err(Error::RemoteQuery {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| Error::RemoteQuery {
        status,
        message: format!("unexpected response shape: {e}"),
    })
}

fn single<T>(rows: Vec<T>) -> Result<T> {
    rows.into_iter().next().ok_or_else(|| Error::RemoteQuery {
        status: 200,
        message: "insert returned no row".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(api_key: &str) -> RemoteConfig {
        RemoteConfig {
            url: Url::parse("https://farm.example.co").unwrap(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn construction_failures_are_configuration_errors() {
        let err = RestStore::new(&config("bad\nkey")).unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(!err.is_remote());
        assert!(RestStore::new(&config("good-key")).is_ok());
    }

    #[test]
    fn table_url_keeps_base_path() {
        let mut cfg = config("k");
        cfg.url = Url::parse("https://farm.example.co/api/?x=1").unwrap();
        let store = RestStore::new(&cfg).unwrap();
        assert_eq!(store.table_url("tasks").as_str(), "https://farm.example.co/api/rest/v1/tasks");
    }
}
