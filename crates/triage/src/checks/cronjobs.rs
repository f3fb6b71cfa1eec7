//! Scheduled-job load.

use async_trait::async_trait;
use std::fmt::Write as _;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Active-run count above which a cron job is considered runaway.
pub const DEFAULT_ACTIVE_THRESHOLD: usize = 100;

/// Fails when a cron job's currently-active run count exceeds the
/// threshold. Independently appends an advisory (without flipping the
/// pass flag) for jobs whose concurrency policy is "Allow", since
/// overlapping runs are how active counts pile up in the first place.
pub struct CronJobCheck {
    active_threshold: usize,
}

impl CronJobCheck {
    pub fn new(active_threshold: usize) -> Self {
        Self { active_threshold }
    }
}

impl Default for CronJobCheck {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVE_THRESHOLD)
    }
}

#[async_trait]
impl Check for CronJobCheck {
    fn name(&self) -> &'static str {
        "cronjobs"
    }

    fn failure_hint(&self) -> &'static str {
        "listing cron jobs"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        let cron_jobs = provider.list_cron_jobs(None).await?;

        let mut pass = true;
        let mut details = String::new();
        for job in &cron_jobs {
            let namespace = job.metadata.namespace.as_deref().unwrap_or("<cluster>");
            let name = job.metadata.name.as_deref().unwrap_or("<unnamed>");

            let active = job
                .status
                .as_ref()
                .and_then(|status| status.active.as_ref())
                .map_or(0, Vec::len);
            if active > self.active_threshold {
                pass = false;
                let _ = writeln!(
                    details,
                    "cron job {namespace}/{name} has too many active runs: {active}"
                );
            }

            let policy = job
                .spec
                .as_ref()
                .and_then(|spec| spec.concurrency_policy.as_deref());
            if policy == Some("Allow") {
                let _ = writeln!(
                    details,
                    "cron job {namespace}/{name} allows concurrent runs"
                );
            }
        }

        Ok(CheckResult::new(self.name(), pass, details))
    }
}
