pub mod advisor;
pub mod assessor;
pub mod config;
pub mod error;
pub mod remote;
pub mod rules;

pub use advisor::{AssessmentSlot, RespiratoryAdvisor, SlotTicket, StampedAssessment};
pub use assessor::{AssessmentSource, RiskAssessor};
pub use config::AdvisorConfig;
pub use error::AdvisorError;
pub use remote::{build_prompt, parse_assessment, GeminiAssessor};
pub use rules::{
    LevelThresholds, NarrativeRule, RiskFactors, RiskWeights, RuleEngine, RuleEvaluation,
    NARRATIVE_RULES,
};
