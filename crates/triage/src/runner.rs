//! Concurrent check execution.
//!
//! The runner fans a registry out as independent tokio tasks against one
//! shared provider handle and blocks until every task has completed; there
//! is no early-exit or fail-fast path, so a slow check delays the report but
//! never corrupts another check's result. Each task hands its single result
//! back through the join primitive; the collector indexes results by
//! registry position and reorders after the join, so completion order is
//! never relied upon and no shared growable container is mutated
//! concurrently.
//!
//! Fault containment happens in layers: provider errors are folded into
//! degraded results by [`Check::execute`], a check that outruns the deadline
//! is abandoned and reported as a timeout, and a check task that dies
//! outright (panic) surfaces as a degraded result at the join.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::checks::{Check, CheckRegistry};
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Executes every registered check concurrently and collects one result per
/// check, in registry order.
pub struct CheckRunner {
    timeout: Duration,
}

impl CheckRunner {
    /// Default per-check deadline.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// A runner whose checks are abandoned and reported as timed out once
    /// `timeout` elapses.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run the full registry against `provider`.
    ///
    /// Always returns exactly `registry.len()` results, one per registered
    /// check, regardless of how many checks fail internally.
    pub async fn run(
        &self,
        registry: &CheckRegistry,
        provider: Arc<dyn ClusterProvider>,
    ) -> Vec<CheckResult> {
        let deadline = self.timeout;
        let mut tasks: JoinSet<(usize, CheckResult)> = JoinSet::new();
        let mut spawned: HashMap<tokio::task::Id, (usize, &'static str)> = HashMap::new();

        for (index, check) in registry.iter().enumerate() {
            let name = check.name();
            let check: Arc<dyn Check> = Arc::clone(check);
            let provider = Arc::clone(&provider);
            let handle = tasks.spawn(async move {
                debug!(check = check.name(), "check started");
                let result =
                    match tokio::time::timeout(deadline, check.execute(provider.as_ref())).await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!(check = check.name(), ?deadline, "check timed out");
                            CheckResult::degraded(
                                check.name(),
                                check.failure_hint(),
                                CheckError::Timeout {
                                    seconds: deadline.as_secs(),
                                },
                            )
                        }
                    };
                debug!(check = check.name(), pass = result.pass, "check finished");
                (index, result)
            });
            spawned.insert(handle.id(), (index, name));
        }

        // One slot per registered check; the join fills every slot exactly
        // once, whether the task returned, timed out, or died.
        let mut slots: Vec<Option<CheckResult>> = Vec::new();
        slots.resize_with(registry.len(), || None);

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, (index, result))) => slots[index] = Some(result),
                Err(join_error) => {
                    let (index, name) = spawned[&join_error.id()];
                    warn!(check = name, error = %join_error, "check task died before returning");
                    slots[index] = Some(CheckResult::degraded(
                        name,
                        "running the check task",
                        CheckError::Aborted(join_error.to_string()),
                    ));
                }
            }
        }

        let results: Vec<CheckResult> = slots.into_iter().flatten().collect();
        debug_assert_eq!(results.len(), registry.len());
        results
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new()
    }
}
