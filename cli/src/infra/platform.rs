//! HTTP client for the platform API.
//!
//! `PlatformClient` implements the application, instance, and logs ports
//! against the REST endpoints. Every request carries the bearer token from the
//! configured target.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use liftoff_common::{AppEntity, AppStateUpdate, ErrorBody, InstanceEntry, Page, Resource};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::application::ports::{
    ApplicationRepository, InstanceRepository, LogStream, LogsRepository,
};
use crate::domain::config::TargetConfig;
use crate::domain::{
    ApiError, AppError, Application, DesiredState, InstanceSnapshot, InstanceState, RouteBinding,
};
use crate::infra::log_stream;

/// Timeout for ordinary API requests. The log tail has none.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Production platform client.
pub struct PlatformClient {
    http: reqwest::Client,
    api: String,
    logs: Option<String>,
    token: Option<String>,
    space_guid: Option<String>,
}

impl PlatformClient {
    /// Build a client for the configured target.
    ///
    /// # Errors
    ///
    /// Returns an error if no API endpoint is configured or the HTTP client
    /// cannot be constructed.
    pub fn new(target: &TargetConfig) -> Result<Self> {
        let api = target.api.as_deref().ok_or_else(|| {
            anyhow::anyhow!("No API endpoint set. Run 'liftoff config set target.api <url>'.")
        })?;
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("liftoff/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            api: api.trim_end_matches('/').to_string(),
            logs: target
                .logs
                .as_deref()
                .map(|l| l.trim_end_matches('/').to_string()),
            token: target.token.clone(),
            space_guid: target.space_guid.clone(),
        })
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.header(reqwest::header::AUTHORIZATION, format!("bearer {token}")),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self
            .authorized(req)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(resp).await
    }
}

/// Turn a response into `T`, or into the backend's error body.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    tracing::debug!(%status, bytes = body.len(), "platform response");

    if status.is_success() {
        return serde_json::from_str(&body)
            .map_err(|e| ApiError::Transport(format!("invalid response body: {e}")));
    }
    Err(backend_error(status, &body))
}

fn backend_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => ApiError::Backend {
            code: err.code.to_string(),
            description: err.description,
        },
        Err(_) => ApiError::Transport(format!("server error, status code: {}", status.as_u16())),
    }
}

fn to_application(resource: Resource<AppEntity>) -> Application {
    let Resource { metadata, entity } = resource;
    Application {
        name: entity.name,
        guid: metadata.guid,
        state: DesiredState::parse(&entity.state),
        instance_count: entity.instances,
        routes: entity
            .routes
            .into_iter()
            .filter_map(|route| {
                let domain = route.entity.domain?;
                Some(RouteBinding {
                    host: route.entity.host,
                    domain: domain.entity.name,
                })
            })
            .collect(),
    }
}

/// Order instance entries by index and keep only their state.
fn to_snapshot(entries: HashMap<String, InstanceEntry>) -> InstanceSnapshot {
    let mut indexed: Vec<(u64, InstanceState)> = entries
        .into_iter()
        .map(|(idx, entry)| {
            (
                idx.parse().unwrap_or(u64::MAX),
                InstanceState::parse(&entry.state),
            )
        })
        .collect();
    indexed.sort_by_key(|(idx, _)| *idx);
    indexed.into_iter().map(|(_, state)| state).collect()
}

impl ApplicationRepository for PlatformClient {
    async fn read(&self, name: &str) -> Result<Application> {
        let space = self.space_guid.as_deref().ok_or(AppError::NoTargetSpace)?;
        let url = format!("{}/v2/spaces/{space}/apps", self.api);
        let query = [
            ("q", format!("name:{name}")),
            ("inline-relations-depth", "2".to_string()),
        ];
        tracing::debug!(%url, app = name, "reading app");
        let page: Page<AppEntity> = self
            .send(self.http.get(&url).query(&query))
            .await
            .with_context(|| format!("finding app {name}"))?;
        page.resources
            .into_iter()
            .next()
            .map(to_application)
            .ok_or_else(|| AppError::NotFound(name.to_string()).into())
    }

    async fn update(&self, guid: &str, state: DesiredState) -> Result<Application> {
        let url = format!("{}/v2/apps/{guid}", self.api);
        let body = AppStateUpdate {
            state: state.as_wire().to_string(),
        };
        tracing::debug!(%url, state = %body.state, "updating app");
        let resource: Resource<AppEntity> = self
            .send(
                self.http
                    .put(&url)
                    .query(&[("inline-relations-depth", "2")])
                    .json(&body),
            )
            .await?;
        Ok(to_application(resource))
    }
}

impl InstanceRepository for PlatformClient {
    async fn get_instances(&self, app_guid: &str) -> Result<InstanceSnapshot, ApiError> {
        let url = format!("{}/v2/apps/{app_guid}/instances", self.api);
        let entries: HashMap<String, InstanceEntry> = self.send(self.http.get(&url)).await?;
        Ok(to_snapshot(entries))
    }
}

impl LogsRepository for PlatformClient {
    async fn tail(&self, app_guid: &str) -> Result<LogStream> {
        let base = self
            .logs
            .as_deref()
            .context("no log endpoint set (target.logs)")?;
        let url = format!("{base}/tail");
        tracing::debug!(%url, app = app_guid, "opening log tail");
        let resp = self
            .authorized(self.http.get(&url).query(&[("app", app_guid)]))
            .send()
            .await
            .context("connecting to log endpoint")?;
        let status = resp.status();
        anyhow::ensure!(
            status.is_success(),
            "log endpoint returned status code {}",
            status.as_u16()
        );
        Ok(log_stream::decode_lines(resp.bytes_stream()))
    }
}
