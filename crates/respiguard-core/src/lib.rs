pub mod alerts;
pub mod error;
pub mod history;
pub mod metrics;
pub mod risk;
#[cfg(test)]
mod tests;

pub use alerts::AlertFlags;
pub use error::CoreError;
pub use history::{SnapshotHistory, Trend, TrendPoint, DEFAULT_CHART_WINDOW, DEFAULT_HISTORY_CAPACITY};
pub use metrics::{
    BoundViolation, EnvironmentalMetrics, HealthMetrics, MetricBound, MetricId, SystemSnapshot,
};
pub use risk::{AssessmentResult, RiskLevel};
