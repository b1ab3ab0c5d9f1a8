use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Skills every candidate must list to be contacted.
pub const DEFAULT_REQUIRED_SKILLS: [&str; 3] = ["Python", "Django", "APIs"];
pub const DEFAULT_MINIMUM_EXPERIENCE_YEARS: u32 = 2;

pub const DEFAULT_EMAIL_SUBJECT: &str = "Job Application Status";
pub const DEFAULT_EMAIL_MESSAGE: &str =
    "Congratulations! Your application has progressed to the next stage.";

/// Application as published by the job portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub skills: Vec<String>,
    pub experience: u32,
    pub email: String,
}

impl Application {
    /// Parse one raw portal record, reporting the first field that is absent or unusable.
    pub fn from_record(index: usize, record: &Value) -> Result<Self, MissingFieldError> {
        let object = record.as_object().ok_or(MissingFieldError {
            index,
            field: "record",
        })?;

        let skills = object
            .get("skills")
            .and_then(Value::as_array)
            .and_then(|values| {
                values
                    .iter()
                    .map(|value| value.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or(MissingFieldError {
                index,
                field: "skills",
            })?;

        let experience = object
            .get("experience")
            .and_then(Value::as_u64)
            .and_then(|years| u32::try_from(years).ok())
            .ok_or(MissingFieldError {
                index,
                field: "experience",
            })?;

        let email = object
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(MissingFieldError {
                index,
                field: "email",
            })?;

        Ok(Self {
            skills,
            experience,
            email,
        })
    }
}

/// A portal record that cannot be screened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("application #{index} has no usable `{field}`")]
pub struct MissingFieldError {
    pub index: usize,
    pub field: &'static str,
}

/// How required skills are compared against the candidate's list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatching {
    #[default]
    Exact,
    CaseInsensitive,
}

impl SkillMatching {
    pub fn matches(self, required: &str, offered: &str) -> bool {
        match self {
            SkillMatching::Exact => required == offered,
            SkillMatching::CaseInsensitive => required.to_lowercase() == offered.to_lowercase(),
        }
    }
}

/// Qualification predicate inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationCriteria {
    pub required_skills: Vec<String>,
    pub minimum_experience_years: u32,
    #[serde(default)]
    pub skill_matching: SkillMatching,
}

impl Default for QualificationCriteria {
    fn default() -> Self {
        Self {
            required_skills: DEFAULT_REQUIRED_SKILLS
                .iter()
                .map(|skill| skill.to_string())
                .collect(),
            minimum_experience_years: DEFAULT_MINIMUM_EXPERIENCE_YEARS,
            skill_matching: SkillMatching::Exact,
        }
    }
}

/// Subject and body sent to each qualified candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub message: String,
}

impl Default for EmailTemplate {
    fn default() -> Self {
        Self {
            subject: DEFAULT_EMAIL_SUBJECT.to_string(),
            message: DEFAULT_EMAIL_MESSAGE.to_string(),
        }
    }
}

/// Payload for the per-candidate `send-email` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl EmailMessage {
    pub fn for_candidate(candidate: &Application, template: &EmailTemplate) -> Self {
        Self {
            email: candidate.email.clone(),
            subject: template.subject.clone(),
            message: template.message.clone(),
        }
    }
}

/// Whether qualified candidates are notified in one request or one request each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    #[default]
    Batch,
    PerCandidate,
}

impl DeliveryMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "batch" => Some(Self::Batch),
            "individual" | "per_candidate" | "per-candidate" => Some(Self::PerCandidate),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DeliveryMode::Batch => "batch",
            DeliveryMode::PerCandidate => "individual",
        }
    }
}
