//! Error types for check execution.

use thiserror::Error;

/// Faults that keep a check from completing cleanly.
///
/// A `CheckError` on a result means the check's own execution was degraded;
/// it is distinct from the check finding the symptom it looks for.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The Kubernetes API call underlying the check failed
    #[error("kubernetes API request failed: {0}")]
    Api(#[from] kube::Error),

    /// The check did not finish within the runner's deadline
    #[error("check timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The check task died before returning a result
    #[error("check task aborted: {0}")]
    Aborted(String),
}

/// Name passed to a registry filter that matches no registered check.
#[derive(Debug, Error)]
#[error("unknown check name: {0}")]
pub struct UnknownCheck(pub String);
