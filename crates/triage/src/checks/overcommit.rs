//! Node resource overcommit.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use std::fmt::Write as _;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::quantity::{cpu_millicores, format_bytes, format_millicores, memory_bytes};
use crate::result::CheckResult;

/// Flags nodes whose scheduled pods declare more CPU or memory in container
/// *limits* than the node advertises as allocatable.
///
/// Note this intentionally sums limits, not requests. The scheduler
/// allocates on requests, so a flagged node is overcommitted in the
/// burst-capacity sense, not necessarily unschedulable.
pub struct OvercommitCheck;

struct NodeCapacity {
    cpu_millicores: i64,
    memory_bytes: i64,
}

fn allocatable(node: &Node) -> NodeCapacity {
    let allocatable = node
        .status
        .as_ref()
        .and_then(|status| status.allocatable.as_ref());
    NodeCapacity {
        cpu_millicores: allocatable
            .and_then(|quantities| quantities.get("cpu"))
            .map_or(0, cpu_millicores),
        memory_bytes: allocatable
            .and_then(|quantities| quantities.get("memory"))
            .map_or(0, memory_bytes),
    }
}

#[async_trait]
impl Check for OvercommitCheck {
    fn name(&self) -> &'static str {
        "overcommit"
    }

    fn failure_hint(&self) -> &'static str {
        "listing nodes and their pods"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        let nodes = provider.list_nodes().await?;

        let mut findings = String::new();
        for node in &nodes {
            let Some(node_name) = node.metadata.name.as_deref() else {
                continue;
            };
            let capacity = allocatable(node);

            let selector = format!("spec.nodeName={node_name}");
            let pods = provider.list_pods(None, Some(&selector)).await?;

            let mut cpu_limit = 0i64;
            let mut memory_limit = 0i64;
            for pod in &pods {
                let containers = pod
                    .spec
                    .as_ref()
                    .map(|spec| spec.containers.as_slice())
                    .unwrap_or_default();
                for container in containers {
                    let Some(limits) = container
                        .resources
                        .as_ref()
                        .and_then(|resources| resources.limits.as_ref())
                    else {
                        continue;
                    };
                    if let Some(cpu) = limits.get("cpu") {
                        cpu_limit += cpu_millicores(cpu);
                    }
                    if let Some(memory) = limits.get("memory") {
                        memory_limit += memory_bytes(memory);
                    }
                }
            }

            if cpu_limit > capacity.cpu_millicores {
                let _ = writeln!(
                    findings,
                    "node {node_name} is overcommitted on CPU: limits {} exceed allocatable {}",
                    format_millicores(cpu_limit),
                    format_millicores(capacity.cpu_millicores),
                );
            }
            if memory_limit > capacity.memory_bytes {
                let _ = writeln!(
                    findings,
                    "node {node_name} is overcommitted on memory: limits {} exceed allocatable {}",
                    format_bytes(memory_limit),
                    format_bytes(capacity.memory_bytes),
                );
            }
        }

        if findings.is_empty() {
            Ok(CheckResult::pass(self.name()))
        } else {
            Ok(CheckResult::symptom(self.name(), findings))
        }
    }
}
