//! Warning events.

use async_trait::async_trait;
use std::fmt::Write as _;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Surfaces every event of type "Warning" across all namespaces, with the
/// object it concerns and the recorded message.
pub struct WarningEventsCheck;

#[async_trait]
impl Check for WarningEventsCheck {
    fn name(&self) -> &'static str {
        "events"
    }

    fn failure_hint(&self) -> &'static str {
        "listing events"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        let events = provider.list_events(None).await?;

        let mut findings = String::new();
        for event in &events {
            if event.type_.as_deref() != Some("Warning") {
                continue;
            }
            let namespace = event.metadata.namespace.as_deref().unwrap_or("<cluster>");
            let kind = event.involved_object.kind.as_deref().unwrap_or("<unknown>");
            let name = event.involved_object.name.as_deref().unwrap_or("<unknown>");
            let message = event.message.as_deref().unwrap_or("");
            let _ = writeln!(findings, "{namespace} {kind}/{name}: {message}");
        }

        if findings.is_empty() {
            Ok(CheckResult::pass(self.name()))
        } else {
            Ok(CheckResult::symptom(self.name(), findings))
        }
    }
}
