//! OOM-killed container detection.

use async_trait::async_trait;
use std::fmt::Write as _;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Flags pods whose last container termination reason is "OOMKilled".
///
/// Only the last termination state is inspected; a container currently
/// running after an OOM kill still carries the evidence there.
pub struct OomCheck;

#[async_trait]
impl Check for OomCheck {
    fn name(&self) -> &'static str {
        "oomkilled"
    }

    fn failure_hint(&self) -> &'static str {
        "listing pods"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        let pods = provider.list_pods(None, None).await?;

        let mut findings = String::new();
        for pod in &pods {
            let namespace = pod.metadata.namespace.as_deref().unwrap_or("<cluster>");
            let pod_name = pod.metadata.name.as_deref().unwrap_or("<unnamed>");
            let statuses = pod
                .status
                .as_ref()
                .and_then(|status| status.container_statuses.as_deref())
                .unwrap_or_default();
            for container in statuses {
                let reason = container
                    .last_state
                    .as_ref()
                    .and_then(|state| state.terminated.as_ref())
                    .and_then(|terminated| terminated.reason.as_deref());
                if reason == Some("OOMKilled") {
                    let _ = writeln!(
                        findings,
                        "pod {namespace}/{pod_name} container {} was previously OOMKilled",
                        container.name
                    );
                }
            }
        }

        if findings.is_empty() {
            Ok(CheckResult::pass(self.name()))
        } else {
            Ok(CheckResult::symptom(self.name(), findings))
        }
    }
}
