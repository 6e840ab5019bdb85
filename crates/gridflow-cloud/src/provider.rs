//! Provider trait definitions
//!
//! All cluster backends implement [`ClusterProvider`]; serverless function
//! backends implement [`FunctionProvider`]. Providers are region-scoped at
//! construction time. Specs cross the boundary as JSON: the template
//! engine produces exactly the document the provider API expects.

use crate::error::Result;
use crate::state::ClusterState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Opaque provider-assigned cluster identifier.
///
/// Ownership of cluster existence lives entirely in the provider; this
/// process holds no durable state of its own, so an id can always be
/// re-attached to after a crash or restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterId(String);

impl ClusterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClusterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Snapshot of a cluster returned by a describe call.
#[derive(Debug, Clone)]
pub struct ClusterDescription {
    pub state: ClusterState,

    /// Public address of the master node; present once the cluster has
    /// provisioned its network.
    pub master_public_dns: Option<String>,
}

/// One row of a cluster listing.
#[derive(Debug, Clone)]
pub struct ClusterSummary {
    pub id: ClusterId,
    pub name: String,
    pub state: ClusterState,
}

/// Cluster backend abstraction.
#[async_trait]
pub trait ClusterProvider: Send + Sync {
    /// Provider name (e.g. "emr").
    fn name(&self) -> &str;

    /// Region this provider instance operates in.
    fn region(&self) -> &str;

    /// Submit a cluster creation document; returns the new cluster id.
    async fn create_cluster(&self, spec: &serde_json::Value) -> Result<ClusterId>;

    /// Describe the current remote state of a cluster.
    async fn describe_cluster(&self, id: &ClusterId) -> Result<ClusterDescription>;

    /// Request termination. Returns once the request is accepted, not once
    /// the cluster is gone; callers poll for TERMINATED.
    async fn terminate_cluster(&self, id: &ClusterId) -> Result<()>;

    /// List all clusters the provider reports, terminal ones included.
    async fn list_clusters(&self) -> Result<Vec<ClusterSummary>>;

    /// Submit a post-provisioning step document; returns the step id.
    async fn submit_step(&self, id: &ClusterId, step: &serde_json::Value) -> Result<String>;
}

/// One row of a function listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub name: String,
    pub runtime: String,
    pub code_size: u64,
    pub last_modified: String,
}

/// Deployment settings for a serverless function.
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    pub name: String,
    /// Entry point, `module.function`.
    pub handler: String,
    pub runtime: String,
    pub role: String,
    pub timeout_secs: u32,
    pub memory_mb: u32,
    /// Pre-built deployment archive; packaging is the caller's concern.
    pub archive: PathBuf,
}

/// Serverless function backend abstraction.
#[async_trait]
pub trait FunctionProvider: Send + Sync {
    async fn list_functions(&self) -> Result<Vec<FunctionSummary>>;

    async fn create_function(&self, config: &FunctionConfig) -> Result<()>;

    async fn update_function_code(&self, name: &str, archive: &Path) -> Result<()>;

    async fn delete_function(&self, name: &str) -> Result<()>;
}
