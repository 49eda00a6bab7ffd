use std::time::Duration;
use thiserror::Error;

/// Failures of the remote strategy. The coordinating advisor recovers from
/// every variant by falling back to the rule engine.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("remote returned no structured text")]
    EmptyResponse,
    #[error("malformed assessment payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("assessment carried no recommendations")]
    MissingRecommendations,
    #[error("remote assessment timed out after {0:?}")]
    Timeout(Duration),
}
