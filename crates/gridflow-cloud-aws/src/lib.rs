//! AWS provider for Gridflow
//!
//! Implements the cluster provider against EMR and the function provider
//! against Lambda by wrapping the `aws` CLI. Cluster and step documents
//! cross the boundary as the JSON the EMR API expects, so the template
//! engine's output is submitted unmodified.
//!
//! # Requirements
//!
//! - the `aws` CLI must be installed and configured
//! - credentials are managed through the AWS CLI configuration
//!
//! # Example
//!
//! ```ignore
//! use gridflow_cloud::ClusterProvider;
//! use gridflow_cloud_aws::EmrProvider;
//!
//! let provider = EmrProvider::new("eu-central-1");
//! let clusters = provider.list_clusters().await?;
//! ```

pub mod awscli;
pub mod error;
pub mod provider;

pub use awscli::AwsCli;
pub use error::{AwsError, Result};
pub use provider::{EmrProvider, LambdaProvider};
