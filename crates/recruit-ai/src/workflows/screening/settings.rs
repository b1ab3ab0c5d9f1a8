use serde::{Deserialize, Serialize};

/// Operator-controlled bot configuration for the screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentSettings {
    /// Upper bound on candidates notified in one run.
    pub maximum_candidates: u32,
    /// When false the run qualifies candidates but sends nothing.
    pub auto_screening_enabled: bool,
    #[serde(default)]
    pub job_titles: Vec<String>,
    /// Résumé keywords; an empty list means the built-in defaults.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub auto_response_threshold: f64,
    #[serde(default)]
    pub auto_rejection_threshold: f64,
}

impl Default for RecruitmentSettings {
    fn default() -> Self {
        Self {
            maximum_candidates: 50,
            auto_screening_enabled: true,
            job_titles: Vec::new(),
            keywords: Vec::new(),
            auto_response_threshold: 0.0,
            auto_rejection_threshold: 0.0,
        }
    }
}

impl RecruitmentSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.maximum_candidates == 0 {
            return Err(SettingsError::Invalid(
                "maximumCandidates must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            ("autoResponseThreshold", self.auto_response_threshold),
            ("autoRejectionThreshold", self.auto_rejection_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }

        if self.auto_response_threshold < self.auto_rejection_threshold {
            return Err(SettingsError::Invalid(
                "autoResponseThreshold must be equal to or greater than autoRejectionThreshold"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Trim list entries and drop the blank ones, as the dashboard's comma lists do.
    pub fn normalized(mut self) -> Self {
        self.job_titles = clean_list(self.job_titles);
        self.keywords = clean_list(self.keywords);
        self
    }

    /// Configured résumé keywords, if any were set.
    pub fn resume_keywords(&self) -> Option<&[String]> {
        (!self.keywords.is_empty()).then_some(self.keywords.as_slice())
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Storage abstraction so the router can be exercised without a backing service.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<RecruitmentSettings, SettingsError>;
    fn save(&self, settings: RecruitmentSettings) -> Result<RecruitmentSettings, SettingsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Invalid(String),
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
}
