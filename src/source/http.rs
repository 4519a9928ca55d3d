//! HTTP data source for the task_tracker web API.
//!
//! ## Endpoints
//!
//! - `GET {endpoint}/project/get/{id}`
//! - `GET {endpoint}/project/monitoring/{id}?count={n}`
//! - `GET {endpoint}/project/assignees/{id}`
//!
//! Answers use the `{ok, message, content}` envelope, except the monitoring
//! endpoint which puts `snapshots` next to `ok`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use tracker_types::{
    ApiResponse, AssignedTasks, AssigneesContent, MonitoringSnapshot, Project, ProjectContent,
    SnapshotsResponse,
};

use super::{FetchError, MonitoringApi};

/// Largest window the backend accepts (`count` must be below 1000).
pub const MAX_WINDOW: usize = 999;

/// Fetches monitoring data from a running task_tracker backend.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    endpoint: String,
    description: String,
}

impl HttpSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn project_url(&self, project_id: i64) -> String {
        format!("{}/project/get/{}", self.endpoint, project_id)
    }

    fn snapshots_url(&self, project_id: i64, count: usize) -> String {
        format!(
            "{}/project/monitoring/{}?count={}",
            self.endpoint,
            project_id,
            count.clamp(1, MAX_WINDOW)
        )
    }

    fn assignees_url(&self, project_id: i64) -> String {
        format!("{}/project/assignees/{}", self.endpoint, project_id)
    }

    /// Send a GET and map non-success statuses to errors.
    async fn send(&self, url: &str) -> Result<Response, FetchError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
            StatusCode::FORBIDDEN => Err(FetchError::Forbidden),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(url.to_string())),
            status if !status.is_success() => {
                // Validation failures still carry the envelope with a message.
                let code = status.as_u16();
                match response.json::<ApiResponse<serde_json::Value>>().await {
                    Ok(ApiResponse {
                        message: Some(message),
                        ..
                    }) => Err(FetchError::Api(message)),
                    _ => Err(FetchError::Status(code)),
                }
            }
            _ => Ok(response),
        }
    }

    async fn get<T>(&self, url: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Default,
    {
        let envelope: ApiResponse<T> = self
            .send(url)
            .await?
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(envelope.into_content()?)
    }
}

#[async_trait]
impl MonitoringApi for HttpSource {
    async fn fetch_project(&self, project_id: i64) -> Result<Project, FetchError> {
        let url = self.project_url(project_id);
        let content: ProjectContent = self.get(&url).await?;
        content.project.ok_or(FetchError::NotFound(url))
    }

    async fn fetch_snapshots(
        &self,
        project_id: i64,
        count: usize,
    ) -> Result<Vec<MonitoringSnapshot>, FetchError> {
        let url = self.snapshots_url(project_id, count);
        let body: SnapshotsResponse = self
            .send(&url)
            .await?
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        body.into_snapshots()?
            .ok_or_else(|| FetchError::Parse(format!("no snapshots in response from {}", url)))
    }

    async fn fetch_assignees(&self, project_id: i64) -> Result<Vec<AssignedTasks>, FetchError> {
        let content: AssigneesContent = self.get(&self.assignees_url(project_id)).await?;
        Ok(content.assignees)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpSource.
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    endpoint: Option<String>,
    session_cookie: Option<String>,
    timeout: Option<Duration>,
}

impl HttpSourceBuilder {
    /// Set the API base URL (e.g., "http://localhost:3010/api").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Send a session cookie (`name=value`) with every request.
    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Set a request timeout. Requests do not time out by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<HttpSource, FetchError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &self.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| FetchError::Http(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let mut client = Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client.build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:3010/api".to_string())
            .trim_end_matches('/')
            .to_string();
        let description = format!("http: {}", endpoint);

        Ok(HttpSource {
            client,
            endpoint,
            description,
        })
    }
}
