//! aws CLI wrapper
//!
//! Wraps `aws emr` and `aws lambda` invocations. Every call is
//! region-scoped and requests JSON output, which is parsed into the typed
//! structs below.

use crate::error::{AwsError, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// aws CLI wrapper, scoped to one region.
pub struct AwsCli {
    region: String,
}

impl AwsCli {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Run an aws command and return stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("aws");
        cmd.arg("--region").arg(&self.region);
        cmd.arg("--output").arg("json");
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: aws --region {} {}", self.region, args.join(" "));

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AwsError::AwsCliNotFound
            } else {
                AwsError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AwsError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Submit a cluster creation document.
    pub async fn create_cluster(&self, spec: &serde_json::Value) -> Result<CreateClusterOutput> {
        let input = serde_json::to_string(spec)?;
        let output = self
            .run(&["emr", "create-cluster", "--cli-input-json", &input])
            .await?;
        Ok(serde_json::from_str(&output)?)
    }

    /// Describe a single cluster.
    pub async fn describe_cluster(&self, cluster_id: &str) -> Result<ClusterDetail> {
        let output = self
            .run(&["emr", "describe-cluster", "--cluster-id", cluster_id])
            .await?;
        let parsed: DescribeClusterOutput = serde_json::from_str(&output)?;
        Ok(parsed.cluster)
    }

    /// Request cluster termination.
    pub async fn terminate_clusters(&self, cluster_id: &str) -> Result<()> {
        self.run(&["emr", "terminate-clusters", "--cluster-ids", cluster_id])
            .await?;
        Ok(())
    }

    /// List clusters, terminal ones included.
    pub async fn list_clusters(&self) -> Result<Vec<ClusterListEntry>> {
        let output = self.run(&["emr", "list-clusters"]).await?;

        if output.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: ListClustersOutput = serde_json::from_str(&output)?;
        Ok(parsed.clusters)
    }

    /// Add steps to a running cluster. `steps` is the JSON array the EMR
    /// AddJobFlowSteps API expects.
    pub async fn add_steps(
        &self,
        cluster_id: &str,
        steps: &serde_json::Value,
    ) -> Result<AddStepsOutput> {
        let steps_json = serde_json::to_string(steps)?;
        let output = self
            .run(&[
                "emr",
                "add-steps",
                "--cluster-id",
                cluster_id,
                "--steps",
                &steps_json,
            ])
            .await?;
        Ok(serde_json::from_str(&output)?)
    }

    /// List Lambda functions.
    pub async fn list_functions(&self) -> Result<Vec<FunctionEntry>> {
        let output = self.run(&["lambda", "list-functions"]).await?;

        if output.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: ListFunctionsOutput = serde_json::from_str(&output)?;
        Ok(parsed.functions)
    }

    /// Create a Lambda function from a pre-built archive.
    pub async fn create_function(
        &self,
        name: &str,
        handler: &str,
        runtime: &str,
        role: &str,
        timeout_secs: u32,
        memory_mb: u32,
        archive: &Path,
    ) -> Result<()> {
        let zip_arg = format!("fileb://{}", archive.display());
        let timeout = timeout_secs.to_string();
        let memory = memory_mb.to_string();

        self.run(&[
            "lambda",
            "create-function",
            "--function-name",
            name,
            "--handler",
            handler,
            "--runtime",
            runtime,
            "--role",
            role,
            "--timeout",
            &timeout,
            "--memory-size",
            &memory,
            "--zip-file",
            &zip_arg,
        ])
        .await?;
        Ok(())
    }

    /// Replace the code of an existing Lambda function.
    pub async fn update_function_code(&self, name: &str, archive: &Path) -> Result<()> {
        let zip_arg = format!("fileb://{}", archive.display());
        self.run(&[
            "lambda",
            "update-function-code",
            "--function-name",
            name,
            "--zip-file",
            &zip_arg,
        ])
        .await?;
        Ok(())
    }

    /// Delete a Lambda function.
    pub async fn delete_function(&self, name: &str) -> Result<()> {
        self.run(&["lambda", "delete-function", "--function-name", name])
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateClusterOutput {
    pub cluster_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeClusterOutput {
    pub cluster: ClusterDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterDetail {
    pub id: String,
    pub status: ClusterStatus,
    pub master_public_dns_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterStatus {
    pub state: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListClustersOutput {
    #[serde(default)]
    pub clusters: Vec<ClusterListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterListEntry {
    pub id: String,
    pub name: String,
    pub status: ClusterStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddStepsOutput {
    pub step_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListFunctionsOutput {
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionEntry {
    pub function_name: String,
    /// Absent for container-image functions.
    pub runtime: Option<String>,
    pub code_size: u64,
    pub last_modified: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_describe_cluster() {
        let raw = r#"{
            "Cluster": {
                "Id": "j-1W1939CQFFXDU",
                "Name": "crunch",
                "Status": {"State": "WAITING", "StateChangeReason": {}},
                "MasterPublicDnsName": "ec2-1-2-3-4.eu-central-1.compute.amazonaws.com"
            }
        }"#;
        let parsed: DescribeClusterOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.cluster.id, "j-1W1939CQFFXDU");
        assert_eq!(parsed.cluster.status.state, "WAITING");
        assert_eq!(
            parsed.cluster.master_public_dns_name.as_deref(),
            Some("ec2-1-2-3-4.eu-central-1.compute.amazonaws.com")
        );
    }

    #[test]
    fn test_parse_describe_without_dns() {
        let raw = r#"{"Cluster": {"Id": "j-1", "Status": {"State": "STARTING"}}}"#;
        let parsed: DescribeClusterOutput = serde_json::from_str(raw).unwrap();
        assert!(parsed.cluster.master_public_dns_name.is_none());
    }

    #[test]
    fn test_parse_list_clusters() {
        let raw = r#"{
            "Clusters": [
                {"Id": "j-1", "Name": "crunch", "Status": {"State": "RUNNING"}},
                {"Id": "j-2", "Name": "cheap", "Status": {"State": "TERMINATED"}}
            ]
        }"#;
        let parsed: ListClustersOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.clusters.len(), 2);
        assert_eq!(parsed.clusters[1].status.state, "TERMINATED");
    }

    #[test]
    fn test_parse_empty_cluster_list() {
        let parsed: ListClustersOutput = serde_json::from_str("{}").unwrap();
        assert!(parsed.clusters.is_empty());
    }

    #[test]
    fn test_parse_add_steps() {
        let raw = r#"{"StepIds": ["s-2AXXXXXXGAPLF"]}"#;
        let parsed: AddStepsOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.step_ids, ["s-2AXXXXXXGAPLF"]);
    }

    #[test]
    fn test_parse_create_cluster() {
        let raw = r#"{"ClusterId": "j-NEW", "ClusterArn": "arn:aws:elasticmapreduce:eu-central-1:123:cluster/j-NEW"}"#;
        let parsed: CreateClusterOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.cluster_id, "j-NEW");
    }

    #[test]
    fn test_parse_list_functions() {
        let raw = r#"{
            "Functions": [
                {
                    "FunctionName": "gridflow-daily",
                    "Runtime": "python3.12",
                    "CodeSize": 1048576,
                    "LastModified": "2024-11-02T06:00:00.000+0000"
                }
            ]
        }"#;
        let parsed: ListFunctionsOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.functions[0].function_name, "gridflow-daily");
        assert_eq!(parsed.functions[0].runtime.as_deref(), Some("python3.12"));
    }
}
