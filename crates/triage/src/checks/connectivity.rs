//! Control-plane connectivity.

use async_trait::async_trait;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Passes when the API server answers a node listing at all; any listing
/// error degrades the check. The cheapest possible "is anyone home" probe.
pub struct ControlPlaneCheck;

#[async_trait]
impl Check for ControlPlaneCheck {
    fn name(&self) -> &'static str {
        "control-plane"
    }

    fn failure_hint(&self) -> &'static str {
        "contacting the API server"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        provider.list_nodes().await?;
        Ok(CheckResult::pass(self.name()))
    }
}
