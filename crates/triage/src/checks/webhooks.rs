//! Admission webhook failure policies.

use async_trait::async_trait;
use std::fmt::Write as _;

use super::Check;
use crate::error::CheckError;
use crate::provider::ClusterProvider;
use crate::result::CheckResult;

/// Flags every admission webhook entry whose failure policy is "Fail".
///
/// Such a webhook blocks the API operations it intercepts whenever its
/// backend is unreachable, so each one is worth knowing about when
/// debugging stuck creates and updates.
pub struct WebhookCheck;

#[async_trait]
impl Check for WebhookCheck {
    fn name(&self) -> &'static str {
        "webhooks"
    }

    fn failure_hint(&self) -> &'static str {
        "listing webhook configurations"
    }

    async fn run(&self, provider: &dyn ClusterProvider) -> Result<CheckResult, CheckError> {
        let mutating = provider.list_mutating_webhooks().await?;
        let validating = provider.list_validating_webhooks().await?;

        let mut findings = String::new();
        for configuration in &mutating {
            for webhook in configuration.webhooks.as_deref().unwrap_or_default() {
                if webhook.failure_policy.as_deref() == Some("Fail") {
                    let _ = writeln!(
                        findings,
                        "mutating webhook {} has failurePolicy Fail",
                        webhook.name
                    );
                }
            }
        }
        for configuration in &validating {
            for webhook in configuration.webhooks.as_deref().unwrap_or_default() {
                if webhook.failure_policy.as_deref() == Some("Fail") {
                    let _ = writeln!(
                        findings,
                        "validating webhook {} has failurePolicy Fail",
                        webhook.name
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
