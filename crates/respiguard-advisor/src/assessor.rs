use crate::error::AdvisorError;
use respiguard_core::{AssessmentResult, SystemSnapshot};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Which strategy produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessmentSource {
    Remote,
    Local,
}

impl AssessmentSource {
    pub fn label(self) -> &'static str {
        match self {
            AssessmentSource::Remote => "remote",
            AssessmentSource::Local => "local",
        }
    }
}

/// A classification strategy: one snapshot in, one assessment out.
pub trait RiskAssessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn source(&self) -> AssessmentSource;

    fn assess(
        &self,
        snapshot: &SystemSnapshot,
    ) -> impl Future<Output = Result<AssessmentResult, AdvisorError>> + Send;
}
