//! Infrastructure pod health.

use async_trait::async_trait;
use std::fmt::Write as _;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Namespace the cluster's own control components usually live in.
pub const DEFAULT_NAMESPACE: &str = "kube-system";

/// Inspects container statuses in the infrastructure namespace: any restart
/// count above zero is flagged, and not-ready containers are flagged
/// separately, since a restarting container and a wedged one are different
/// leads.
pub struct InfraHealthCheck {
    namespace: String,
}

impl InfraHealthCheck {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
        }
    }
}

impl Default for InfraHealthCheck {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

#[async_trait]
impl Check for InfraHealthCheck {
    fn name(&self) -> &'static str {
        "infra-health"
    }

    fn failure_hint(&self) -> &'static str {
        "listing infrastructure pods"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        let pods = provider.list_pods(Some(&self.namespace), None).await?;

        let mut findings = String::new();
        for pod in &pods {
            let pod_name = pod.metadata.name.as_deref().unwrap_or("<unnamed>");
            let statuses = pod
                .status
                .as_ref()
                .and_then(|status| status.container_statuses.as_deref())
                .unwrap_or_default();
            for container in statuses {
                if container.restart_count > 0 {
                    let _ = writeln!(
                        findings,
                        "pod {pod_name} container {} has restarted {} times",
                        container.name, container.restart_count
                    );
                }
                if !container.ready {
                    let _ = writeln!(
                        findings,
                        "pod {pod_name} container {} is not ready",
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
