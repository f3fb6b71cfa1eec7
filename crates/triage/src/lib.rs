//! Concurrent diagnostic check engine for Kubernetes clusters.
//!
//! The engine runs a fixed library of independent diagnostic rules
//! ("checks") against a shared, read-only cluster accessor and aggregates
//! their outcomes into one deterministic report:
//!
//! - [`ClusterProvider`] is the boundary to the cluster: typed list calls,
//!   nothing else. Checks are tested against a mock of it, the binary wires
//!   in [`KubeProvider`] over a live `kube::Client`.
//! - [`Check`] is one diagnostic rule; [`CheckRegistry`] is the ordered set
//!   of rules for a run.
//! - [`CheckRunner`] fans the registry out as concurrent tasks, contains
//!   per-check faults (API errors, deadlines, panics), and joins them into
//!   one [`CheckResult`] per registered check, in registry order.
//! - [`ReportSink`] renders the ordered results; formatting (color, symbols)
//!   stays outside this crate.
//!
//! All cluster access is read-only. Checks share nothing but the provider
//! handle, so two list calls are not guaranteed to observe the cluster at
//! the same instant.

pub mod checks;
pub mod error;
pub mod provider;
pub mod quantity;
pub mod report;
pub mod result;
pub mod runner;

pub use checks::{Check, CheckRegistry, RegistryOptions};
pub use error::{CheckError, UnknownCheck};
pub use provider::{ClusterProvider, KubeProvider};
pub use report::{render, ReportSink, ReportSummary, WriterSink};
pub use result::CheckResult;
pub use runner::CheckRunner;
