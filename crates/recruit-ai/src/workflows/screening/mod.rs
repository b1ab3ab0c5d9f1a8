//! Candidate screening: fetch portal applications, keep the qualified ones,
//! and notify them through the HR system.

pub mod domain;
pub mod notifier;
pub mod qualifier;
pub mod router;
pub mod settings;
pub mod source;
pub mod workflow;

pub use domain::{
    Application, DeliveryMode, EmailMessage, EmailTemplate, MissingFieldError,
    QualificationCriteria, SkillMatching,
};
pub use notifier::{
    DeliveryFailure, HrClient, NotificationGateway, NotificationOutcome, Notifier, NotifyError,
};
pub use qualifier::{CandidateQualifier, Screening};
pub use router::screening_router;
pub use settings::{RecruitmentSettings, SettingsError, SettingsStore};
pub use source::{ApplicationFeed, ApplicationSource, PortalClient, SourceError};
pub use workflow::{ScreeningRunError, ScreeningSummary, ScreeningWorkflow};
