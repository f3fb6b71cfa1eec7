//! Node readiness.

use async_trait::async_trait;
use std::fmt::Write as _;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Flags every node whose "Ready" condition reports status "False".
///
/// The match is exact: a condition stuck at "Unknown" is a different
/// symptom (kubelet unreachable) and is not flagged here.
pub struct NodeReadinessCheck;

#[async_trait]
impl Check for NodeReadinessCheck {
    fn name(&self) -> &'static str {
        "node-readiness"
    }

    fn failure_hint(&self) -> &'static str {
        "listing nodes"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        let nodes = provider.list_nodes().await?;

        let mut findings = String::new();
        for node in &nodes {
            let name = node.metadata.name.as_deref().unwrap_or("<unnamed>");
            let conditions = node
                .status
                .as_ref()
                .and_then(|status| status.conditions.as_deref())
                .unwrap_or_default();
            for condition in conditions {
                if condition.type_ == "Ready" && condition.status == "False" {
                    let _ = writeln!(findings, "node {name} is NotReady");
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
