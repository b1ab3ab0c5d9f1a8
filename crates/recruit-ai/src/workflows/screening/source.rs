use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Anything able to list the current job applications.
#[async_trait]
pub trait ApplicationSource: Send + Sync {
    async fn fetch_applications(&self) -> Result<Vec<Value>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("job portal request failed: {0}")]
    Transport(String),
    #[error("job portal responded with HTTP {status}")]
    Status { status: u16 },
    #[error("job portal response was not a list of applications: {0}")]
    Decode(String),
}

/// Bearer-authenticated client for `GET {base}/applications`.
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PortalClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/applications", self.base_url)
    }
}

#[async_trait]
impl ApplicationSource for PortalClient {
    async fn fetch_applications(&self) -> Result<Vec<Value>, SourceError> {
        let endpoint = self.endpoint();
        debug!(%endpoint, "requesting job applications");

        let response = self
            .client
            .get(&endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| SourceError::Decode(err.to_string()))?;

        match body {
            Value::Array(records) => Ok(records),
            other => Err(SourceError::Decode(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Execution context that fetches applications at most once.
///
/// A failed fetch leaves the cell empty so the next call tries again. Each
/// feed owns its own cell; nothing is shared between feeds.
pub struct ApplicationFeed {
    source: Arc<dyn ApplicationSource>,
    applications: OnceCell<Arc<Vec<Value>>>,
}

impl ApplicationFeed {
    pub fn new(source: Arc<dyn ApplicationSource>) -> Self {
        Self {
            source,
            applications: OnceCell::new(),
        }
    }

    pub async fn applications(&self) -> Result<Arc<Vec<Value>>, SourceError> {
        let records = self
            .applications
            .get_or_try_init(|| async {
                let records = self.source.fetch_applications().await?;
                info!(count = records.len(), "fetched job applications");
                Ok::<_, SourceError>(Arc::new(records))
            })
            .await?;
        Ok(Arc::clone(records))
    }

    pub fn is_loaded(&self) -> bool {
        self.applications.initialized()
    }
}

impl std::fmt::Debug for ApplicationFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationFeed")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
