//! Remote apply: PUT the descriptor to the orchestration API.

use std::time::Duration;

use tracing::{info, warn};

use crate::descriptor::Descriptor;
use crate::error::{DeployError, Result};

const USER_AGENT: &str = concat!("mdeploy/", env!("CARGO_PKG_VERSION"));

/// Request shaping for [`RemoteApplier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Append `force=true` so the orchestrator overrides locked deployments.
    pub force: bool,
    pub timeout: Option<Duration>,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            force: true,
            timeout: None,
        }
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// URL the request was sent to.
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`DeployError::RemoteApplyFailed`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(DeployError::RemoteApplyFailed {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// HTTP client for the orchestrator's `/v2/apps` endpoint.
pub struct RemoteApplier {
    client: reqwest::Client,
    options: ApplyOptions,
}

impl RemoteApplier {
    pub fn new(options: ApplyOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            options,
        })
    }

    /// Reuse an existing client. The client's own timeout applies.
    pub fn with_client(client: reqwest::Client, options: ApplyOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> ApplyOptions {
        self.options
    }

    /// `{server}/v2/apps/{id}`, plus `?force=true` when forcing.
    ///
    /// The id is inserted verbatim, so namespaced ids such as `group/app`
    /// map onto nested paths.
    pub fn app_url(server: &str, app_id: &str, force: bool) -> String {
        let base = server.trim_end_matches('/');
        if force {
            format!("{base}/v2/apps/{app_id}?force=true")
        } else {
            format!("{base}/v2/apps/{app_id}")
        }
    }

    /// Send the update and return whatever the server answered, whatever
    /// the status. Only network-level failures are errors here.
    pub async fn put(&self, server: &str, descriptor: &Descriptor) -> Result<RawResponse> {
        let app_id = descriptor
            .id()
            .ok_or_else(|| DeployError::invalid("descriptor is missing 'id' key"))?;
        let url = Self::app_url(server, app_id, self.options.force);

        info!("PUT {url}");
        let response = self.client.put(&url).json(descriptor).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, "error updating application");
        }
        Ok(RawResponse {
            url,
            status: status.as_u16(),
            body,
        })
    }

    /// [`put`](Self::put) followed by a status check.
    pub async fn apply(&self, server: &str, descriptor: &Descriptor) -> Result<RawResponse> {
        self.put(server, descriptor).await?.error_for_status()
    }
}
