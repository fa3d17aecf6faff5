// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the Dremio REST API
//!
//! `RestClient` performs the bearer-token login and issues authenticated
//! requests against the submit, job-status, and results endpoints. The
//! poll/fetch layers talk to it through the [`DremioApi`] trait so the job
//! state machine can be exercised without a server.

pub mod wire;

use self::wire::{JobId, JobStatus, LoginRequest, LoginResponse, ResultsPage};
use crate::config::DremioConfig;
use crate::error::{DremioError, DremioResult};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("dremio-driver-rust/", env!("CARGO_PKG_VERSION"));

/// Server operations needed by the job poller and the row cursor
#[async_trait]
pub trait DremioApi: Send + Sync {
    /// POST the serialized query envelope; returns the assigned job id
    async fn submit(&self, envelope: &[u8]) -> DremioResult<String>;

    /// GET the current status of a job
    async fn job_status(&self, job_id: &str) -> DremioResult<JobStatus>;

    /// GET one results page; `Ok(None)` means the server answered with a
    /// non-object body (an empty result set)
    async fn fetch_page(
        &self,
        job_id: &str,
        offset: usize,
        limit: usize,
    ) -> DremioResult<Option<ResultsPage>>;
}

/// Authenticated HTTP client bound to one Dremio server
pub struct RestClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl RestClient {
    /// Log in with the configured credentials and return a client holding
    /// the bearer token.
    ///
    /// The login endpoint is the only one called without the auth header.
    /// A response carrying `errorMessage` fails with the server's text; an
    /// undecodable body fails with a decode error.
    pub async fn login(config: &DremioConfig) -> DremioResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        let base = config.base_url();

        debug!(host = %config.host, user = %config.username, "logging in to dremio");
        let body = LoginRequest {
            user_name: config.username.clone(),
            password: config.password.clone(),
        };
        let resp = http
            .post(format!("{base}/apiv2/login"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let text = resp.text().await?;
        let login: LoginResponse = serde_json::from_str(&text).map_err(|e| DremioError::Decode {
            context: "login token",
            message: e.to_string(),
        })?;
        if let Some(message) = login.error_message {
            return Err(DremioError::LoginFailed(message));
        }

        info!(host = %config.host, "dremio login succeeded");
        Ok(Self {
            http,
            base,
            token: login.token,
        })
    }

    fn auth_header(&self) -> String {
        format!("_dremio{}", self.token)
    }

    fn sql_url(&self) -> String {
        format!("{}/api/v3/sql", self.base)
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/api/v3/job/{}", self.base, job_id)
    }

    fn results_url(&self, job_id: &str, offset: usize, limit: usize) -> String {
        format!(
            "{}/api/v3/job/{}/results?offset={}&limit={}",
            self.base, job_id, offset, limit
        )
    }

    async fn post(&self, url: String, body: Vec<u8>) -> DremioResult<reqwest::Response> {
        Ok(self
            .http
            .post(url)
            .header(AUTHORIZATION, self.auth_header())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?)
    }

    async fn get(&self, url: String) -> DremioResult<reqwest::Response> {
        Ok(self
            .http
            .get(url)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .send()
            .await?)
    }
}

#[async_trait]
impl DremioApi for RestClient {
    async fn submit(&self, envelope: &[u8]) -> DremioResult<String> {
        debug!("submitting query");
        let resp = self.post(self.sql_url(), envelope.to_vec()).await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return match status {
                StatusCode::NOT_FOUND | StatusCode::GONE | StatusCode::BAD_GATEWAY => {
                    Err(DremioError::ConnectionDone)
                }
                _ => {
                    let body = resp.text().await.unwrap_or_default();
                    Err(DremioError::QueryFailed(body))
                }
            };
        }
        let job: JobId = resp.json().await.map_err(|_| DremioError::Decode {
            context: "job id",
            message: format!("status code: {status}"),
        })?;
        debug!(job = %job.id, "query submitted");
        Ok(job.id)
    }

    async fn job_status(&self, job_id: &str) -> DremioResult<JobStatus> {
        let resp = self.get(self.job_url(job_id)).await?;
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| DremioError::Decode {
            context: "job status",
            message: e.to_string(),
        })
    }

    async fn fetch_page(
        &self,
        job_id: &str,
        offset: usize,
        limit: usize,
    ) -> DremioResult<Option<ResultsPage>> {
        debug!(job = %job_id, offset, limit, "fetching results page");
        let resp = self.get(self.results_url(job_id, offset, limit)).await?;
        let text = resp.text().await?;
        if !text.starts_with('{') {
            return Ok(None);
        }
        let page = serde_json::from_str(&text).map_err(|e| DremioError::Decode {
            context: "job results",
            message: e.to_string(),
        })?;
        Ok(Some(page))
    }
}

// Token is deliberately absent from Debug output.
impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient").field("base", &self.base).finish()
    }
}
