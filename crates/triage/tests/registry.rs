//! End-to-end runs of the built-in registry against fixture clusters.

use async_trait::async_trait;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhook, MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::batch::v1::{CronJob, CronJobSpec, CronJobStatus};
use k8s_openapi::api::core::v1::{
    Container, ContainerState, ContainerStateTerminated, ContainerStatus, EndpointAddress,
    EndpointSubset, Endpoints, Event, Node, NodeCondition, NodeStatus, ObjectReference, Pod,
    PodSpec, PodStatus, ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use triage::{CheckError, CheckRegistry, CheckRunner, ClusterProvider, ReportSummary};

fn meta(name: &str, namespace: Option<&str>) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(str::to_string),
        ..Default::default()
    }
}

fn quantity_map(cpu: &str, memory: &str) -> BTreeMap<String, Quantity> {
    let mut map = BTreeMap::new();
    map.insert("cpu".to_string(), Quantity(cpu.to_string()));
    map.insert("memory".to_string(), Quantity(memory.to_string()));
    map
}

fn node(name: &str, ready: &str, cpu: &str, memory: &str) -> Node {
    Node {
        metadata: meta(name, None),
        status: Some(NodeStatus {
            conditions: Some(vec![NodeCondition {
                type_: "Ready".to_string(),
                status: ready.to_string(),
                ..Default::default()
            }]),
            allocatable: Some(quantity_map(cpu, memory)),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn pod(name: &str, namespace: &str, limits: Option<(&str, &str)>, statuses: Vec<ContainerStatus>) -> Pod {
    Pod {
        metadata: meta(name, Some(namespace)),
        spec: Some(PodSpec {
            node_name: Some("node-1".to_string()),
            containers: vec![Container {
                name: "main".to_string(),
                resources: limits.map(|(cpu, memory)| ResourceRequirements {
                    limits: Some(quantity_map(cpu, memory)),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        }),
        status: Some(PodStatus {
            container_statuses: Some(statuses),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn healthy_status(name: &str) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        ready: true,
        restart_count: 0,
        ..Default::default()
    }
}

fn oom_status(name: &str) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        ready: true,
        last_state: Some(ContainerState {
            terminated: Some(ContainerStateTerminated {
                reason: Some("OOMKilled".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn endpoints(name: &str, backed: bool) -> Endpoints {
    Endpoints {
        metadata: meta(name, Some("default")),
        subsets: backed.then(|| {
            vec![EndpointSubset {
                addresses: Some(vec![EndpointAddress {
                    ip: "10.0.0.1".to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }]
        }),
    }
}

fn event(name: &str, type_: &str, message: &str) -> Event {
    Event {
        metadata: meta(name, Some("default")),
        involved_object: ObjectReference {
            kind: Some("Pod".to_string()),
            name: Some("api-0".to_string()),
            ..Default::default()
        },
        type_: Some(type_.to_string()),
        message: Some(message.to_string()),
        ..Default::default()
    }
}

fn cron_job(name: &str, active: usize, policy: &str) -> CronJob {
    CronJob {
        metadata: meta(name, Some("batch")),
        spec: Some(CronJobSpec {
            concurrency_policy: Some(policy.to_string()),
            ..Default::default()
        }),
        status: Some(CronJobStatus {
            active: Some(vec![ObjectReference::default(); active]),
            ..Default::default()
        }),
    }
}

fn api_error() -> CheckError {
    CheckError::Api(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: "endpoints is forbidden".to_string(),
        reason: "Forbidden".to_string(),
        code: 403,
    }))
}

/// An immutable cluster snapshot served with artificial, per-call varying
/// latency. Listings that should fail are modeled with `deny_*` flags.
#[derive(Default)]
struct FixtureCluster {
    nodes: Vec<Node>,
    pods: Vec<Pod>,
    endpoints: Vec<Endpoints>,
    mutating: Vec<MutatingWebhookConfiguration>,
    validating: Vec<ValidatingWebhookConfiguration>,
    events: Vec<Event>,
    cron_jobs: Vec<CronJob>,
    deny_endpoints: bool,
    deny_events: bool,
    calls: AtomicU64,
}

impl FixtureCluster {
    async fn lag(&self) {
        let sequence = self.calls.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(sequence * 7 % 13)).await;
    }
}

#[async_trait]
impl ClusterProvider for FixtureCluster {
    async fn list_nodes(&self) -> Result<Vec<Node>, CheckError> {
        self.lag().await;
        Ok(self.nodes.clone())
    }

    async fn list_pods<'a>(
        &self,
        namespace: Option<&'a str>,
        field_selector: Option<&'a str>,
    ) -> Result<Vec<Pod>, CheckError> {
        self.lag().await;
        let node_filter = field_selector
            .and_then(|selector| selector.strip_prefix("spec.nodeName="))
            .map(str::to_string);
        Ok(self
            .pods
            .iter()
            .filter(|pod| match namespace {
                Some(ns) => pod.metadata.namespace.as_deref() == Some(ns),
                None => true,
            })
            .filter(|pod| match &node_filter {
                Some(node_name) => {
                    pod.spec.as_ref().and_then(|spec| spec.node_name.as_deref())
                        == Some(node_name.as_str())
                }
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn list_endpoints<'a>(
        &self,
        _namespace: Option<&'a str>,
    ) -> Result<Vec<Endpoints>, CheckError> {
        self.lag().await;
        if self.deny_endpoints {
            return Err(api_error());
        }
        Ok(self.endpoints.clone())
    }

    async fn list_mutating_webhooks(
        &self,
    ) -> Result<Vec<MutatingWebhookConfiguration>, CheckError> {
        self.lag().await;
        Ok(self.mutating.clone())
    }

    async fn list_validating_webhooks(
        &self,
    ) -> Result<Vec<ValidatingWebhookConfiguration>, CheckError> {
        self.lag().await;
        Ok(self.validating.clone())
    }

    async fn list_events<'a>(
        &self,
        _namespace: Option<&'a str>,
    ) -> Result<Vec<Event>, CheckError> {
        self.lag().await;
        if self.deny_events {
            return Err(api_error());
        }
        Ok(self.events.clone())
    }

    async fn list_cron_jobs<'a>(
        &self,
        _namespace: Option<&'a str>,
    ) -> Result<Vec<CronJob>, CheckError> {
        self.lag().await;
        Ok(self.cron_jobs.clone())
    }
}

fn healthy_cluster() -> FixtureCluster {
    FixtureCluster {
        nodes: vec![node("node-1", "True", "4", "8Gi")],
        pods: vec![
            pod("api-0", "default", Some(("1", "1Gi")), vec![healthy_status("api")]),
            pod("coredns-0", "kube-system", None, vec![healthy_status("dns")]),
        ],
        endpoints: vec![endpoints("api", true)],
        events: vec![event("started", "Normal", "Started container")],
        cron_jobs: vec![cron_job("backup", 1, "Forbid")],
        ..Default::default()
    }
}

fn sick_cluster() -> FixtureCluster {
    FixtureCluster {
        nodes: vec![node("node-1", "False", "4", "8Gi")],
        pods: vec![
            // Two pods each limited to 3 CPU against 4 allocatable.
            pod("api-0", "default", Some(("3", "1Gi")), vec![oom_status("api")]),
            pod("api-1", "default", Some(("3", "1Gi")), vec![healthy_status("api")]),
            pod(
                "coredns-0",
                "kube-system",
                None,
                vec![ContainerStatus {
                    name: "dns".to_string(),
                    ready: false,
                    restart_count: 4,
                    ..Default::default()
                }],
            ),
        ],
        endpoints: vec![endpoints("api", true), endpoints("orphaned", false)],
        mutating: vec![MutatingWebhookConfiguration {
            metadata: meta("inject", None),
            webhooks: Some(vec![MutatingWebhook {
                name: "inject.example.com".to_string(),
                failure_policy: Some("Fail".to_string()),
                ..Default::default()
            }]),
        }],
        events: vec![event("backoff", "Warning", "Back-off restarting failed container")],
        cron_jobs: vec![cron_job("reindex", 101, "Allow")],
        ..Default::default()
    }
}

fn shape(results: &[triage::CheckResult]) -> Vec<(String, bool, String, bool)> {
    results
        .iter()
        .map(|result| {
            (
                result.name.clone(),
                result.pass,
                result.details.clone(),
                result.error.is_some(),
            )
        })
        .collect()
}

#[tokio::test]
async fn a_healthy_cluster_passes_every_builtin_check() {
    let provider = Arc::new(healthy_cluster());
    let registry = CheckRegistry::builtin();

    let results = CheckRunner::new().run(&registry, provider).await;

    assert_eq!(results.len(), registry.len());
    for result in &results {
        assert!(result.pass, "{} failed: {}", result.name, result.details);
        assert!(result.error.is_none());
    }
    assert!(ReportSummary::of(&results).all_passed());
}

#[tokio::test]
async fn a_sick_cluster_fails_the_expected_checks() {
    let provider = Arc::new(sick_cluster());
    let registry = CheckRegistry::builtin();

    let results = CheckRunner::new().run(&registry, provider).await;
    let by_name = |name: &str| {
        results
            .iter()
            .find(|result| result.name == name)
            .unwrap_or_else(|| panic!("missing result for {name}"))
    };

    assert!(by_name("control-plane").pass);

    let readiness = by_name("node-readiness");
    assert!(!readiness.pass);
    assert!(readiness.details.contains("node-1"));

    let overcommit = by_name("overcommit");
    assert!(!overcommit.pass);
    assert!(overcommit.details.contains("6000m"));
    assert!(overcommit.details.contains("4000m"));

    let endpoints = by_name("endpoints");
    assert!(!endpoints.pass);
    assert!(endpoints.details.contains("orphaned"));
    assert!(!endpoints.details.contains("service api"));

    let webhooks = by_name("webhooks");
    assert!(!webhooks.pass);
    assert!(webhooks.details.contains("inject.example.com"));

    let events = by_name("events");
    assert!(!events.pass);
    assert!(events.details.contains("Back-off"));

    let infra = by_name("infra-health");
    assert!(!infra.pass);
    assert!(infra.details.contains("restarted 4 times"));
    assert!(infra.details.contains("not ready"));

    let cron_jobs = by_name("cronjobs");
    assert!(!cron_jobs.pass);
    assert!(cron_jobs.details.contains("too many active runs: 101"));
    assert!(cron_jobs.details.contains("allows concurrent runs"));

    let oom = by_name("oomkilled");
    assert!(!oom.pass);
    assert!(oom.details.contains("default/api-0"));

    // Symptoms, not degradations: every failure here completed cleanly.
    for result in &results {
        assert!(result.error.is_none(), "{} degraded", result.name);
        if !result.pass {
            assert!(!result.details.is_empty());
        }
    }
}

#[tokio::test]
async fn two_runs_over_a_static_cluster_are_identical() {
    let provider = Arc::new(sick_cluster());
    let registry = CheckRegistry::builtin();
    let runner = CheckRunner::new();

    let first = runner.run(&registry, Arc::clone(&provider) as Arc<dyn ClusterProvider>).await;
    let second = runner.run(&registry, provider).await;

    assert_eq!(shape(&first), shape(&second));
}

#[tokio::test]
async fn partial_provider_failure_never_loses_results() {
    let provider = Arc::new(FixtureCluster {
        nodes: vec![node("node-1", "True", "4", "8Gi")],
        deny_endpoints: true,
        deny_events: true,
        ..Default::default()
    });
    let registry = CheckRegistry::builtin();

    let results = CheckRunner::new().run(&registry, provider).await;

    assert_eq!(results.len(), registry.len());
    assert_eq!(registry.names(), results.iter().map(|r| r.name.as_str()).collect::<Vec<_>>());

    let summary = ReportSummary::of(&results);
    assert_eq!(summary.degraded, 2);
    for result in &results {
        if result.is_degraded() {
            assert!(result.details.contains("could not complete"));
        }
    }
}

#[tokio::test]
async fn latency_jitter_never_perturbs_the_report_order() {
    let registry = CheckRegistry::builtin();
    for _ in 0..10 {
        let provider = Arc::new(sick_cluster());
        let results = CheckRunner::new().run(&registry, provider).await;
        assert_eq!(
            results.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            registry.names(),
        );
    }
}
