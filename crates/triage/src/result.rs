//! The result model: one immutable value per check invocation.

use serde::{Serialize, Serializer};

use crate::error::CheckError;

/// Outcome of a single check invocation.
///
/// Exactly one of these is produced per registered check per run.
/// `pass == false` with no `error` means the check completed and found the
/// symptom it looks for; a populated `error` means the check's own execution
/// was degraded (provider fault, deadline, or task failure).
#[derive(Debug, Serialize)]
pub struct CheckResult {
    /// Stable check identifier, used for report ordering and assertions.
    pub name: String,
    /// Whether the cluster is clean as far as this check is concerned.
    pub pass: bool,
    /// Findings text. Empty on a clean pass; non-empty on a failure; may be
    /// non-empty on a pass for advisory-only findings.
    pub details: String,
    /// Underlying fault when the check could not complete.
    #[serde(serialize_with = "error_as_string", skip_serializing_if = "Option::is_none")]
    pub error: Option<CheckError>,
}

impl CheckResult {
    /// A result with an explicit pass flag and findings text.
    pub fn new(name: &str, pass: bool, details: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            pass,
            details: details.into(),
            error: None,
        }
    }

    /// A clean pass with nothing to report.
    pub fn pass(name: &str) -> Self {
        Self::new(name, true, "")
    }

    /// The check completed and found its symptom.
    pub fn symptom(name: &str, details: impl Into<String>) -> Self {
        Self::new(name, false, details)
    }

    /// The check could not complete; `hint` names the provider access that
    /// was in flight so the report distinguishes this from a found symptom.
    pub fn degraded(name: &str, hint: &str, error: CheckError) -> Self {
        Self {
            name: name.to_string(),
            pass: false,
            details: format!("check could not complete while {hint}"),
            error: Some(error),
        }
    }

    /// Whether this result reports a degraded check rather than an outcome.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

fn error_as_string<S: Serializer>(
    error: &Option<CheckError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}
