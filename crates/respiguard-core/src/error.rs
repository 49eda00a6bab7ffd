use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("history capacity must be at least 1")]
    ZeroCapacity,
    #[error("trend window must cover at least 2 snapshots, got {0}")]
    WindowTooSmall(usize),
}
