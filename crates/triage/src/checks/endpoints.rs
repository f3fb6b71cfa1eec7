//! Service endpoints.

use async_trait::async_trait;
use std::fmt::Write as _;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Flags endpoints objects with zero subsets, i.e. services with no
/// healthy backing pods.
pub struct EndpointsCheck;

#[async_trait]
impl Check for EndpointsCheck {
    fn name(&self) -> &'static str {
        "endpoints"
    }

    fn failure_hint(&self) -> &'static str {
        "listing endpoints"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        let endpoints = provider.list_endpoints(None).await?;

        let mut findings = String::new();
        for endpoint in &endpoints {
            let subsets = endpoint.subsets.as_deref().unwrap_or_default();
            if subsets.is_empty() {
                let name = endpoint.metadata.name.as_deref().unwrap_or("<unnamed>");
                let _ = writeln!(findings, "service {name} has no active endpoints");
            }
        }

        if findings.is_empty() {
            Ok(CheckResult::pass(self.name()))
        } else {
            Ok(CheckResult::symptom(self.name(), findings))
        }
    }
}
