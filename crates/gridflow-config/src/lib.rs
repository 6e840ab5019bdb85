//! Gridflow configuration
//!
//! Settings are read once at startup from `GRIDFLOW_*` environment
//! variables, with compiled-in defaults for everything but the optional
//! integrations. No configuration files: the tool runs the same from a
//! laptop, CI, or a scheduled function.

pub mod error;

pub use error::*;

use std::time::Duration;

/// Process-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Region operated on by default (`GRIDFLOW_REGION`).
    pub region: String,

    /// SSH keyfile used to reach the master node (`GRIDFLOW_SSH_KEY`).
    pub ssh_key_path: String,

    /// EC2 key pair name referenced by cluster templates
    /// (`GRIDFLOW_EC2_KEY_NAME`).
    pub ec2_key_name: String,

    /// S3 bucket for logs, packages and notebook storage
    /// (`GRIDFLOW_S3_BUCKET`).
    pub s3_bucket: String,

    /// S3 key prefix for the gridflow package (`GRIDFLOW_S3_PREFIX`).
    pub s3_prefix: String,

    /// Subnets eligible for cluster instances, comma separated; empty
    /// leaves subnet selection to the provider (`GRIDFLOW_EC2_SUBNET_IDS`).
    pub ec2_subnet_ids: Vec<String>,

    /// Managed security group for the master node
    /// (`GRIDFLOW_MASTER_SECURITY_GROUP`).
    pub emr_master_security_group: Option<String>,

    /// Managed security group for worker nodes
    /// (`GRIDFLOW_WORKER_SECURITY_GROUP`).
    pub emr_worker_security_group: Option<String>,

    /// Slack incoming-webhook URL; notifications are disabled when unset
    /// (`GRIDFLOW_SLACK_WEBHOOK`).
    pub slack_webhook: Option<String>,

    /// IAM role for deployed functions; required only by `functions deploy`
    /// (`GRIDFLOW_LAMBDA_ROLE`).
    pub lambda_role: Option<String>,

    /// Runtime for deployed functions (`GRIDFLOW_LAMBDA_RUNTIME`).
    pub lambda_runtime: String,

    /// Execution timeout for deployed functions (`GRIDFLOW_LAMBDA_TIMEOUT`).
    pub lambda_timeout_secs: u32,

    /// Memory limit for deployed functions (`GRIDFLOW_LAMBDA_MEMORY`).
    pub lambda_memory_mb: u32,

    /// Seconds between cluster state polls (`GRIDFLOW_POLL_SECONDS`).
    pub poll_interval_secs: u64,

    /// Optional cap on poll iterations; unset waits indefinitely
    /// (`GRIDFLOW_POLL_MAX_ATTEMPTS`).
    pub poll_max_attempts: Option<u32>,
}

fn env_or(var: &'static str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(var: &'static str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(
    var: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T> {
    match env_opt(var) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            var,
            value: raw,
            expected,
        }),
    }
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            region: env_or("GRIDFLOW_REGION", "eu-central-1"),
            ssh_key_path: env_or("GRIDFLOW_SSH_KEY", "~/.ssh/gridflow.pem"),
            ec2_key_name: env_or("GRIDFLOW_EC2_KEY_NAME", "gridflow"),
            s3_bucket: env_or("GRIDFLOW_S3_BUCKET", "gridflow-data"),
            s3_prefix: env_or("GRIDFLOW_S3_PREFIX", "gridflow/pkg"),
            ec2_subnet_ids: env_opt("GRIDFLOW_EC2_SUBNET_IDS")
                .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            emr_master_security_group: env_opt("GRIDFLOW_MASTER_SECURITY_GROUP"),
            emr_worker_security_group: env_opt("GRIDFLOW_WORKER_SECURITY_GROUP"),
            slack_webhook: env_opt("GRIDFLOW_SLACK_WEBHOOK"),
            lambda_role: env_opt("GRIDFLOW_LAMBDA_ROLE"),
            lambda_runtime: env_or("GRIDFLOW_LAMBDA_RUNTIME", "python3.12"),
            lambda_timeout_secs: env_parse("GRIDFLOW_LAMBDA_TIMEOUT", 20, "seconds")?,
            lambda_memory_mb: env_parse("GRIDFLOW_LAMBDA_MEMORY", 512, "megabytes")?,
            poll_interval_secs: env_parse("GRIDFLOW_POLL_SECONDS", 10, "seconds")?,
            poll_max_attempts: env_opt("GRIDFLOW_POLL_MAX_ATTEMPTS")
                .map(|raw| {
                    raw.parse().map_err(|_| ConfigError::InvalidValue {
                        var: "GRIDFLOW_POLL_MAX_ATTEMPTS",
                        value: raw,
                        expected: "a positive integer",
                    })
                })
                .transpose()?,
        })
    }

    /// S3 URI clusters write their logs to.
    pub fn log_uri(&self) -> String {
        format!("s3n://{}/gridflow/logs/emr/", self.s3_bucket)
    }

    /// S3 URI of the gridflow toolkit package installed on cluster nodes.
    pub fn package_uri(&self, version: &str) -> String {
        format!(
            "s3://{}/{}/gridflow-tools-{}.tar.gz",
            self.s3_bucket, self.s3_prefix, version
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
