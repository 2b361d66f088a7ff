//! Latest published version badge.
//!
//! The layout may show the latest version of the documented tool. The fetch
//! is best-effort: it runs once in the background, failures are logged and
//! leave the badge empty, and nothing is cached or retried.

use std::sync::Arc;
use std::time::Duration;

use dv_config::VersionConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use ureq::Agent;

/// Version fetch error.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// HTTP request failed (network error, timeout, invalid body).
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),
    /// Registry answered with an error status.
    #[error("registry returned HTTP {0}")]
    Status(u16),
}

/// Source of the latest published version.
///
/// Implementations may block; they are always called off the async runtime.
pub trait VersionSource: Send + Sync + 'static {
    /// Latest version, or `None` if the source has no version to report.
    fn latest_version(&self) -> Result<Option<String>, VersionError>;
}

/// Package registry endpoint returning JSON with a `version` field.
pub struct RegistryVersionSource {
    agent: Agent,
    url: String,
}

impl RegistryVersionSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            url: url.into(),
        }
    }

    pub fn from_config(config: &VersionConfig) -> Self {
        Self::new(
            &config.registry_url,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl VersionSource for RegistryVersionSource {
    fn latest_version(&self) -> Result<Option<String>, VersionError> {
        tracing::debug!(url = %self.url, "Fetching latest version");

        let response = self
            .agent
            .get(&self.url)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(VersionError::Status(status));
        }

        let mut body = response.into_body();
        let json: serde_json::Value = body.read_json()?;
        Ok(version_field(&json))
    }
}

fn version_field(json: &serde_json::Value) -> Option<String> {
    json.get("version")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Fetch progress of a version badge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionState {
    Pending,
    Ready(String),
    /// Fetch failed or returned no version; the badge is omitted.
    Unavailable,
}

/// Background version fetch owned by the layout.
///
/// Dropping the badge aborts the fetch; a late result is discarded.
pub struct VersionBadge {
    state: watch::Receiver<VersionState>,
    task: JoinHandle<()>,
}

impl VersionBadge {
    /// Start fetching on the ambient tokio runtime.
    pub fn spawn(source: Arc<dyn VersionSource>) -> Self {
        let (tx, rx) = watch::channel(VersionState::Pending);

        let task = tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || source.latest_version()).await;
            let state = match result {
                Ok(Ok(Some(version))) => {
                    tracing::info!(%version, "Fetched latest version");
                    VersionState::Ready(version)
                }
                Ok(Ok(None)) => {
                    tracing::warn!("Version response has no version field");
                    VersionState::Unavailable
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Failed to fetch latest version");
                    VersionState::Unavailable
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Version fetch task failed");
                    VersionState::Unavailable
                }
            };
            if tx.send(state).is_err() {
                tracing::debug!("Version badge dropped before the fetch completed");
            }
        });

        Self { state: rx, task }
    }

    pub fn state(&self) -> VersionState {
        self.state.borrow().clone()
    }

    /// Fetched version, if available.
    pub fn version(&self) -> Option<String> {
        match &*self.state.borrow() {
            VersionState::Ready(version) => Some(version.clone()),
            VersionState::Pending | VersionState::Unavailable => None,
        }
    }

    /// Wait until the fetch settles or `timeout` elapses, then return the
    /// current state.
    pub async fn settle(&mut self, timeout: Duration) -> VersionState {
        let settled = match tokio::time::timeout(
            timeout,
            self.state.wait_for(|s| *s != VersionState::Pending),
        )
        .await
        {
            Ok(Ok(state)) => Some(state.clone()),
            Ok(Err(_)) | Err(_) => None,
        };
        settled.unwrap_or_else(|| self.state())
    }
}

impl Drop for VersionBadge {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for VersionBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionBadge")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
