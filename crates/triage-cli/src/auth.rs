//! Kubernetes client construction.

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;
use tracing::debug;

/// Build an authenticated client from an explicit kubeconfig path, or fall
/// back to the standard loading chain (in-cluster service account, then
/// `$KUBECONFIG`, then `~/.kube/config`).
pub async fn build_client(kubeconfig: Option<&Path>) -> Result<Client> {
    match kubeconfig {
        Some(path) => {
            debug!(path = %path.display(), "loading explicit kubeconfig");
            let kubeconfig = Kubeconfig::read_from(path)
                .with_context(|| format!("reading kubeconfig {}", path.display()))?;
            let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .context("building client configuration from kubeconfig")?;
            Client::try_from(config).context("constructing Kubernetes client")
        }
        None => Client::try_default()
            .await
            .context("constructing Kubernetes client from the default loading chain"),
    }
}
