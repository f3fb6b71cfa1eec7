//! The diagnostic check library.
//!
//! Each submodule holds one independent rule. A check is a pure function of
//! the [`ClusterProvider`]: it issues read calls, produces one
//! [`CheckResult`], and keeps no state between runs. Faults are contained at
//! the check boundary: a provider error becomes a degraded result, never a
//! run-terminating condition.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::error::{CheckError, UnknownCheck};
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

pub mod connectivity;
pub mod cronjobs;
pub mod endpoints;
pub mod events;
pub mod infra;
pub mod oom;
pub mod overcommit;
pub mod readiness;
pub mod webhooks;

pub use connectivity::ControlPlaneCheck;
pub use cronjobs::CronJobCheck;
pub use endpoints::EndpointsCheck;
pub use events::WarningEventsCheck;
pub use infra::InfraHealthCheck;
pub use oom::OomCheck;
pub use overcommit::OvercommitCheck;
pub use readiness::NodeReadinessCheck;
pub use webhooks::WebhookCheck;

/// One diagnostic rule.
///
/// Implementations return `Err` for provider faults and rely on
/// [`Check::execute`] to fold the fault into a degraded result, so the
/// individual rules stay free of error-conversion boilerplate.
#[async_trait]
pub trait Check: Send + Sync {
    /// Stable identifier, used for report ordering and registry filters.
    fn name(&self) -> &'static str;

    /// Names the provider access the check performs, for degraded results
    /// ("check could not complete while {hint}").
    fn failure_hint(&self) -> &'static str;

    /// Evaluate the rule against the cluster.
    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError>;

    /// Evaluate the rule, containing any fault as a degraded result.
    async fn execute(&self, provider: &dyn ClusterProvider) -> CheckResult {
        match self.run(provider).await {
            Ok(result) => result,
            Err(error) => {
                warn!(check = self.name(), %error, "check degraded by provider fault");
                CheckResult::degraded(self.name(), self.failure_hint(), error)
            }
        }
    }
}

/// Tunables for the built-in registry.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Namespace holding the cluster's infrastructure pods.
    pub infra_namespace: String,
    /// Active-run count above which a cron job is flagged.
    pub cron_active_threshold: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            infra_namespace: infra::DEFAULT_NAMESPACE.to_string(),
            cron_active_threshold: cronjobs::DEFAULT_ACTIVE_THRESHOLD,
        }
    }
}

/// An ordered collection of checks to execute.
///
/// Ordering defines the report order, never the execution order; the runner
/// schedules every check concurrently regardless.
pub struct CheckRegistry {
    checks: Vec<Arc<dyn Check>>,
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.names())
            .finish()
    }
}

impl CheckRegistry {
    /// A registry over an explicit list of checks.
    pub fn new(checks: Vec<Arc<dyn Check>>) -> Self {
        Self { checks }
    }

    /// The nine built-in checks with default tunables.
    pub fn builtin() -> Self {
        Self::builtin_with(&RegistryOptions::default())
    }

    /// The nine built-in checks.
    pub fn builtin_with(options: &RegistryOptions) -> Self {
        Self::new(vec![
            Arc::new(ControlPlaneCheck),
            Arc::new(EndpointsCheck),
            Arc::new(WarningEventsCheck),
            Arc::new(InfraHealthCheck::new(&options.infra_namespace)),
            Arc::new(NodeReadinessCheck),
            Arc::new(OvercommitCheck),
            Arc::new(WebhookCheck),
            Arc::new(CronJobCheck::new(options.cron_active_threshold)),
            Arc::new(OomCheck),
        ])
    }

    /// Keep only the named checks, preserving registry order.
    ///
    /// Rejects names that match no registered check so a typo surfaces
    /// before the run instead of silently shrinking the report.
    pub fn retain(self, names: &[String]) -> Result<Self, UnknownCheck> {
        for name in names {
            if !self.checks.iter().any(|check| check.name() == name) {
                return Err(UnknownCheck(name.clone()));
            }
        }
        Ok(Self::new(
            self.checks
                .into_iter()
                .filter(|check| names.iter().any(|name| name == check.name()))
                .collect(),
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Check>> {
        self.checks.iter()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Registered check names, in report order.
    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }
}
