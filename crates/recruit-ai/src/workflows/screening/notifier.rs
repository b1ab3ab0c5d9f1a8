use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::domain::{Application, DeliveryMode, EmailMessage, EmailTemplate};

/// Outbound hook to the HR system. Implementations return the HTTP status code.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_email(&self, message: &EmailMessage) -> Result<u16, NotifyError>;
    async fn send_batch(&self, emails: &[String]) -> Result<u16, NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("HR system request failed: {0}")]
    Transport(String),
    #[error("HR system responded with HTTP {0}")]
    Rejected(u16),
}

/// Bearer-authenticated client for the HR system's email endpoints.
#[derive(Debug, Clone)]
pub struct HrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HrClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn post<T: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<u16, NotifyError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl NotificationGateway for HrClient {
    async fn send_email(&self, message: &EmailMessage) -> Result<u16, NotifyError> {
        self.post("send-email", message).await
    }

    async fn send_batch(&self, emails: &[String]) -> Result<u16, NotifyError> {
        self.post("send-emails-batch", &json!({ "emails": emails }))
            .await
    }
}

/// Candidate whose notification did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryFailure {
    pub email: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub delivered: Vec<String>,
    pub failed: Vec<DeliveryFailure>,
}

/// Dispatches the congratulation email to qualified candidates.
pub struct Notifier {
    gateway: Arc<dyn NotificationGateway>,
    mode: DeliveryMode,
    template: EmailTemplate,
}

impl Notifier {
    pub fn new(gateway: Arc<dyn NotificationGateway>, mode: DeliveryMode) -> Self {
        Self::with_template(gateway, mode, EmailTemplate::default())
    }

    pub fn with_template(
        gateway: Arc<dyn NotificationGateway>,
        mode: DeliveryMode,
        template: EmailTemplate,
    ) -> Self {
        Self {
            gateway,
            mode,
            template,
        }
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    pub async fn notify(&self, candidates: &[Application]) -> NotificationOutcome {
        if candidates.is_empty() {
            return NotificationOutcome::default();
        }

        match self.mode {
            DeliveryMode::Batch => self.notify_batch(candidates).await,
            DeliveryMode::PerCandidate => self.notify_each(candidates).await,
        }
    }

    async fn notify_batch(&self, candidates: &[Application]) -> NotificationOutcome {
        let emails: Vec<String> = candidates.iter().map(|c| c.email.clone()).collect();
        let mut outcome = NotificationOutcome::default();

        match accepted(self.gateway.send_batch(&emails).await) {
            Ok(()) => {
                info!(count = emails.len(), "batch notification sent");
                outcome.delivered = emails;
            }
            Err(err) => {
                warn!(count = emails.len(), error = %err, "batch notification failed");
                let reason = err.to_string();
                outcome.failed = emails
                    .into_iter()
                    .map(|email| DeliveryFailure {
                        email,
                        reason: reason.clone(),
                    })
                    .collect();
            }
        }

        outcome
    }

    async fn notify_each(&self, candidates: &[Application]) -> NotificationOutcome {
        let mut outcome = NotificationOutcome::default();

        for candidate in candidates {
            let message = EmailMessage::for_candidate(candidate, &self.template);
            match accepted(self.gateway.send_email(&message).await) {
                Ok(()) => {
                    info!(email = %candidate.email, "email sent");
                    outcome.delivered.push(candidate.email.clone());
                }
                Err(err) => {
                    warn!(email = %candidate.email, error = %err, "failed to send email");
                    outcome.failed.push(DeliveryFailure {
                        email: candidate.email.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        outcome
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("mode", &self.mode)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

/// Only HTTP 200 counts as delivered.
fn accepted(result: Result<u16, NotifyError>) -> Result<(), NotifyError> {
    match result? {
        200 => Ok(()),
        status => Err(NotifyError::Rejected(status)),
    }
}
