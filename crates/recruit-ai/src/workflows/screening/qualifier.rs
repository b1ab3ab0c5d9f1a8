use serde_json::Value;
use tracing::warn;

use super::domain::{Application, MissingFieldError, QualificationCriteria};

/// Stateless filter applying the qualification predicate.
#[derive(Debug, Clone)]
pub struct CandidateQualifier {
    criteria: QualificationCriteria,
}

impl CandidateQualifier {
    pub fn new(criteria: QualificationCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &QualificationCriteria {
        &self.criteria
    }

    pub fn is_qualified(&self, application: &Application) -> bool {
        let matching = self.criteria.skill_matching;
        let has_skills = self.criteria.required_skills.iter().all(|required| {
            application
                .skills
                .iter()
                .any(|offered| matching.matches(required, offered))
        });

        has_skills && application.experience >= self.criteria.minimum_experience_years
    }

    /// Keep the qualifying applications in their original order.
    pub fn qualify(&self, applications: &[Application]) -> Vec<Application> {
        applications
            .iter()
            .filter(|application| self.is_qualified(application))
            .cloned()
            .collect()
    }

    /// Parse and filter raw portal records; malformed records are skipped.
    pub fn screen(&self, records: &[Value]) -> Screening {
        let mut screening = Screening::default();

        for (index, record) in records.iter().enumerate() {
            match Application::from_record(index, record) {
                Ok(application) if self.is_qualified(&application) => {
                    screening.qualified.push(application)
                }
                Ok(_) => screening.rejected += 1,
                Err(err) => {
                    warn!(index = err.index, field = err.field, "skipping malformed application");
                    screening.malformed.push(err);
                }
            }
        }

        screening
    }
}

impl Default for CandidateQualifier {
    fn default() -> Self {
        Self::new(QualificationCriteria::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screening {
    pub qualified: Vec<Application>,
    pub rejected: usize,
    pub malformed: Vec<MissingFieldError>,
}
