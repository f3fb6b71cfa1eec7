//! The cluster accessor boundary.
//!
//! Checks never talk to the API server directly; they consume the
//! [`ClusterProvider`] capability, which is nothing more than the typed list
//! calls the check library needs. Keeping the boundary this narrow lets every
//! check run against a mock in unit tests and against [`KubeProvider`] (a
//! thin wrapper over `kube::Client`) in a real run.

use async_trait::async_trait;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::batch::v1::CronJob;
use k8s_openapi::api::core::v1::{Endpoints, Event, Node, Pod};
use kube::api::ListParams;
use kube::{Api, Client};

use crate::error::CheckError;

/// Read-only listings of the cluster objects the check library inspects.
///
/// Every method issues an independent list call; two calls are not
/// guaranteed to observe the cluster at the same instant. A `namespace` of
/// `None` lists across all namespaces.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterProvider: Send + Sync {
    async fn list_nodes(&self) -> Result<Vec<Node>, CheckError>;

    async fn list_pods<'a>(
        &self,
        namespace: Option<&'a str>,
        field_selector: Option<&'a str>,
    ) -> Result<Vec<Pod>, CheckError>;

    async fn list_endpoints<'a>(
        &self,
        namespace: Option<&'a str>,
    ) -> Result<Vec<Endpoints>, CheckError>;

    async fn list_mutating_webhooks(
        &self,
    ) -> Result<Vec<MutatingWebhookConfiguration>, CheckError>;

    async fn list_validating_webhooks(
        &self,
    ) -> Result<Vec<ValidatingWebhookConfiguration>, CheckError>;

    async fn list_events<'a>(&self, namespace: Option<&'a str>)
        -> Result<Vec<Event>, CheckError>;

    async fn list_cron_jobs<'a>(
        &self,
        namespace: Option<&'a str>,
    ) -> Result<Vec<CronJob>, CheckError>;
}

/// Live provider backed by an authenticated `kube::Client`.
#[derive(Clone)]
pub struct KubeProvider {
    client: Client,
}

impl KubeProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn scoped<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }
}

#[async_trait]
impl ClusterProvider for KubeProvider {
    async fn list_nodes(&self) -> Result<Vec<Node>, CheckError> {
        let api: Api<Node> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_pods<'a>(
        &self,
        namespace: Option<&'a str>,
        field_selector: Option<&'a str>,
    ) -> Result<Vec<Pod>, CheckError> {
        let api: Api<Pod> = self.scoped(namespace);
        let mut params = ListParams::default();
        if let Some(fields) = field_selector {
            params = params.fields(fields);
        }
        Ok(api.list(&params).await?.items)
    }

    async fn list_endpoints<'a>(
        &self,
        namespace: Option<&'a str>,
    ) -> Result<Vec<Endpoints>, CheckError> {
        let api: Api<Endpoints> = self.scoped(namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_mutating_webhooks(
        &self,
    ) -> Result<Vec<MutatingWebhookConfiguration>, CheckError> {
        let api: Api<MutatingWebhookConfiguration> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_validating_webhooks(
        &self,
    ) -> Result<Vec<ValidatingWebhookConfiguration>, CheckError> {
        let api: Api<ValidatingWebhookConfiguration> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_events<'a>(
        &self,
        namespace: Option<&'a str>,
    ) -> Result<Vec<Event>, CheckError> {
        let api: Api<Event> = self.scoped(namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_cron_jobs<'a>(
        &self,
        namespace: Option<&'a str>,
    ) -> Result<Vec<CronJob>, CheckError> {
        let api: Api<CronJob> = self.scoped(namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }
}
