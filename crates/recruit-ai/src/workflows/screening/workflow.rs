use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use super::domain::{Application, DeliveryMode, QualificationCriteria};
use super::notifier::{DeliveryFailure, HrClient, NotificationGateway, Notifier};
use super::qualifier::CandidateQualifier;
use super::settings::RecruitmentSettings;
use super::source::{ApplicationFeed, ApplicationSource, PortalClient, SourceError};
use crate::config::{AppConfig, ConfigError};

/// Fetch → qualify → notify, one stage after the other.
///
/// Every run fetches through its own [`ApplicationFeed`]. Addresses that were
/// delivered to are remembered for the lifetime of the workflow and skipped
/// by later runs.
pub struct ScreeningWorkflow {
    source: Arc<dyn ApplicationSource>,
    qualifier: CandidateQualifier,
    notifier: Option<Notifier>,
    notified: Mutex<HashSet<String>>,
}

impl ScreeningWorkflow {
    pub fn new(
        source: Arc<dyn ApplicationSource>,
        gateway: Arc<dyn NotificationGateway>,
        criteria: QualificationCriteria,
        notifier_mode: DeliveryMode,
    ) -> Self {
        Self {
            notifier: Some(Notifier::new(gateway, notifier_mode)),
            ..Self::qualify_only(source, criteria)
        }
    }

    /// Workflow without an HR gateway; qualified candidates are always deferred.
    pub fn qualify_only(
        source: Arc<dyn ApplicationSource>,
        criteria: QualificationCriteria,
    ) -> Self {
        Self {
            source,
            qualifier: CandidateQualifier::new(criteria),
            notifier: None,
            notified: Mutex::new(HashSet::new()),
        }
    }

    /// Build the HTTP-backed workflow. Fails before any request when a key is missing.
    pub fn from_config(
        config: &AppConfig,
        criteria: QualificationCriteria,
    ) -> Result<Self, ScreeningRunError> {
        let portal = portal_from_config(config)?;
        let hr_key = config.hr.require_api_key()?;
        let hr = HrClient::new(&config.hr.base_url, hr_key, config.http.timeout)
            .map_err(|err| ScreeningRunError::Client(err.to_string()))?;

        Ok(Self::new(
            Arc::new(portal),
            Arc::new(hr),
            criteria,
            config.hr.delivery_mode,
        ))
    }

    /// Portal-only workflow for dry runs; the HR key is not required.
    pub fn dry_run_from_config(
        config: &AppConfig,
        criteria: QualificationCriteria,
    ) -> Result<Self, ScreeningRunError> {
        let portal = portal_from_config(config)?;
        Ok(Self::qualify_only(Arc::new(portal), criteria))
    }

    pub async fn run(
        &self,
        settings: &RecruitmentSettings,
    ) -> Result<ScreeningSummary, ScreeningRunError> {
        let feed = ApplicationFeed::new(Arc::clone(&self.source));

        info!("fetching job applications");
        let records = feed.applications().await?;

        info!("filtering candidates based on criteria");
        let screening = self.qualifier.screen(&records);

        let mut summary = ScreeningSummary {
            fetched: records.len(),
            qualified: screening.qualified.len(),
            rejected: screening.rejected,
            malformed: screening.malformed.len(),
            ..ScreeningSummary::default()
        };

        if screening.qualified.is_empty() {
            info!("no suitable candidates found");
        } else {
            self.dispatch(screening.qualified, settings, &mut summary)
                .await;
        }

        info!("{}", summary.summary_line());
        Ok(summary)
    }

    async fn dispatch(
        &self,
        qualified: Vec<Application>,
        settings: &RecruitmentSettings,
        summary: &mut ScreeningSummary,
    ) {
        // Held until delivery is recorded so overlapping runs cannot both send.
        let mut notified = self.notified.lock().await;

        let pending: Vec<Application> = qualified
            .into_iter()
            .filter(|candidate| !notified.contains(&candidate.email))
            .collect();
        summary.already_notified = summary.qualified - pending.len();

        let notifier = match &self.notifier {
            Some(notifier) if settings.auto_screening_enabled => notifier,
            _ => {
                info!(
                    pending = pending.len(),
                    "notifications disabled; deferring candidates"
                );
                summary.deferred = pending.len();
                return;
            }
        };

        let cap = usize::try_from(settings.maximum_candidates).unwrap_or(usize::MAX);
        let (batch, overflow) = pending.split_at(cap.min(pending.len()));
        summary.deferred = overflow.len();

        if batch.is_empty() {
            return;
        }

        info!(
            count = batch.len(),
            mode = notifier.mode().label(),
            "sending emails to filtered candidates"
        );
        let outcome = notifier.notify(batch).await;
        notified.extend(outcome.delivered.iter().cloned());

        summary.notified = outcome.delivered.len();
        summary.delivered = outcome.delivered;
        summary.failures = outcome.failed;
    }
}

fn portal_from_config(config: &AppConfig) -> Result<PortalClient, ScreeningRunError> {
    let portal_key = config.portal.require_api_key()?;
    PortalClient::new(&config.portal.base_url, portal_key, config.http.timeout)
        .map_err(|err| ScreeningRunError::Client(err.to_string()))
}

impl std::fmt::Debug for ScreeningWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreeningWorkflow")
            .field("qualifier", &self.qualifier)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

/// Counts reported at the end of a screening run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScreeningSummary {
    pub fetched: usize,
    pub qualified: usize,
    pub rejected: usize,
    pub malformed: usize,
    pub already_notified: usize,
    pub notified: usize,
    pub deferred: usize,
    pub delivered: Vec<String>,
    pub failures: Vec<DeliveryFailure>,
}

impl ScreeningSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "screening: {} fetched, {} qualified, {} skipped (malformed), {} notified, {} failed, {} deferred, {} already notified",
            self.fetched,
            self.qualified,
            self.malformed,
            self.notified,
            self.failed(),
            self.deferred,
            self.already_notified
        )
    }
}

/// Stage-global failures that abort the screening pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningRunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("unable to fetch applications: {0}")]
    Fetch(#[from] SourceError),
    #[error("unable to build HTTP client: {0}")]
    Client(String),
}
