use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use crate::config::{Credentials, UpstreamConfig};
use crate::data::types::{Snapshot, StatesResponse};

/// Why a snapshot looks the way it does. Callers only ever see the snapshot;
/// the status exists for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Ok,
    UpstreamUnavailable,
    UpstreamMalformed,
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub snapshot: Snapshot,
    pub status: FetchStatus,
}

impl FetchOutcome {
    pub fn ok(snapshot: Snapshot) -> Self {
        Self { snapshot, status: FetchStatus::Ok }
    }

    pub fn failed(status: FetchStatus) -> Self {
        Self { snapshot: Snapshot::empty(), status }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(StatusCode),

    #[error("Malformed payload: {0}")]
    Malformed(reqwest::Error),
}

impl FetchError {
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchError::Transport(_) | FetchError::Status(_) => FetchStatus::UpstreamUnavailable,
            FetchError::Malformed(_) => FetchStatus::UpstreamMalformed,
        }
    }
}

/// Anything that can produce a fresh snapshot per request
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Never fails; problems degrade to an empty snapshot
    async fn fetch_snapshot(&self) -> FetchOutcome;
}

pub struct OpenSkyClient {
    client: Client,
    states_url: String,
    user_agent: String,
    credentials: Option<Credentials>,
}

impl OpenSkyClient {
    pub fn new(config: &UpstreamConfig, credentials: Option<Credentials>) -> Self {
        Self {
            client: Client::new(),
            states_url: config.states_url.clone(),
            user_agent: config.user_agent.clone(),
            credentials,
        }
    }

    pub fn states_url(&self) -> &str {
        &self.states_url
    }

    /// Single GET against the states endpoint, one attempt
    async fn try_fetch(&self) -> Result<Snapshot, FetchError> {
        let mut request = self.client
            .get(&self.states_url)
            .header(USER_AGENT, &self.user_agent);

        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let parsed: StatesResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Malformed(e)
            } else {
                FetchError::Transport(e)
            }
        })?;

        Ok(parsed.into())
    }
}

#[async_trait]
impl SnapshotSource for OpenSkyClient {
    async fn fetch_snapshot(&self) -> FetchOutcome {
        match self.try_fetch().await {
            Ok(snapshot) => {
                debug!("Fetched {} state vectors from {}", snapshot.len(), self.states_url);
                FetchOutcome::ok(snapshot)
            }
            Err(e) => {
                warn!("Error fetching flight data from {}: {}", self.states_url, e);
                FetchOutcome::failed(e.status())
            }
        }
    }
}
