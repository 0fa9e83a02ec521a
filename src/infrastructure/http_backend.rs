// HTTP zone backend implementation
use crate::application::zone_backend::{StatusReply, ZoneBackend};
use crate::domain::counts::{EditorSnapshot, ZoneReading};
use crate::domain::zone::{NewZone, SavedZone};
use crate::infrastructure::config::BackendSettings;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("response from {url} (HTTP {status}) is not the expected JSON")]
    Decode {
        url: String,
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct HttpZoneBackend {
    client: reqwest::Client,
    base_url: String,
    zones_path: String,
    editor_counts_path: String,
    dashboard_counts_path: String,
}

impl HttpZoneBackend {
    pub fn new(settings: &BackendSettings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &settings.session_cookie {
            let value = HeaderValue::from_str(cookie).context("Invalid session cookie")?;
            headers.insert(COOKIE, value);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            zones_path: settings.zones_path.clone(),
            editor_counts_path: settings.editor_counts_path.clone(),
            dashboard_counts_path: settings.dashboard_counts_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and decode the JSON body whatever the HTTP status; the backend
    /// reports outcomes in the body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        url: String,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| BackendError::Decode {
            url,
            status,
            source,
        })
    }
}

#[async_trait]
impl ZoneBackend for HttpZoneBackend {
    async fn create_zone(&self, zone: &NewZone) -> anyhow::Result<StatusReply> {
        let url = self.url(&self.zones_path);
        let request = self.client.post(&url).json(zone);
        Ok(self.send_json(url, request).await?)
    }

    async fn delete_last_zone(&self) -> anyhow::Result<StatusReply> {
        let url = self.url(&self.zones_path);
        let request = self.client.delete(&url);
        Ok(self.send_json(url, request).await?)
    }

    async fn list_zones(&self) -> anyhow::Result<Vec<SavedZone>> {
        let url = self.url(&self.zones_path);
        let request = self.client.get(&url);
        Ok(self.send_json(url, request).await?)
    }

    async fn editor_counts(&self) -> anyhow::Result<EditorSnapshot> {
        let url = self.url(&self.editor_counts_path);
        let request = self.client.get(&url);
        Ok(self.send_json(url, request).await?)
    }

    async fn dashboard_counts(&self) -> anyhow::Result<Vec<ZoneReading>> {
        let url = self.url(&self.dashboard_counts_path);
        let request = self.client.get(&url);
        Ok(self.send_json(url, request).await?)
    }
}
