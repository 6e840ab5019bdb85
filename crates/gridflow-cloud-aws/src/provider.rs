//! EMR and Lambda provider implementations

use crate::awscli::AwsCli;
use crate::error::AwsError;
use async_trait::async_trait;
use gridflow_cloud::{
    CloudError, ClusterDescription, ClusterId, ClusterProvider, ClusterState, ClusterSummary,
    FunctionConfig, FunctionProvider, FunctionSummary,
};
use std::path::Path;

fn provider_err(e: AwsError) -> CloudError {
    CloudError::Provider(e.to_string())
}

/// EMR-backed cluster provider.
pub struct EmrProvider {
    cli: AwsCli,
    region: String,
}

impl EmrProvider {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            cli: AwsCli::new(&region),
            region,
        }
    }
}

#[async_trait]
impl ClusterProvider for EmrProvider {
    fn name(&self) -> &str {
        "emr"
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn create_cluster(&self, spec: &serde_json::Value) -> gridflow_cloud::Result<ClusterId> {
        let output = self.cli.create_cluster(spec).await.map_err(provider_err)?;
        Ok(ClusterId::new(output.cluster_id))
    }

    async fn describe_cluster(
        &self,
        id: &ClusterId,
    ) -> gridflow_cloud::Result<ClusterDescription> {
        let detail = self
            .cli
            .describe_cluster(id.as_str())
            .await
            .map_err(provider_err)?;
        Ok(ClusterDescription {
            state: ClusterState::from(detail.status.state.as_str()),
            master_public_dns: detail.master_public_dns_name,
        })
    }

    async fn terminate_cluster(&self, id: &ClusterId) -> gridflow_cloud::Result<()> {
        self.cli
            .terminate_clusters(id.as_str())
            .await
            .map_err(provider_err)
    }

    async fn list_clusters(&self) -> gridflow_cloud::Result<Vec<ClusterSummary>> {
        let entries = self.cli.list_clusters().await.map_err(provider_err)?;
        Ok(entries
            .into_iter()
            .map(|entry| ClusterSummary {
                id: ClusterId::new(entry.id),
                name: entry.name,
                state: ClusterState::from(entry.status.state.as_str()),
            })
            .collect())
    }

    async fn submit_step(
        &self,
        id: &ClusterId,
        step: &serde_json::Value,
    ) -> gridflow_cloud::Result<String> {
        // The AddJobFlowSteps API takes a list; one step per submission.
        let steps = serde_json::Value::Array(vec![step.clone()]);
        let output = self
            .cli
            .add_steps(id.as_str(), &steps)
            .await
            .map_err(provider_err)?;
        output
            .step_ids
            .into_iter()
            .next()
            .ok_or_else(|| CloudError::Provider("add-steps returned no step id".to_string()))
    }
}

/// Lambda-backed function provider.
pub struct LambdaProvider {
    cli: AwsCli,
}

impl LambdaProvider {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            cli: AwsCli::new(region),
        }
    }
}

#[async_trait]
impl FunctionProvider for LambdaProvider {
    async fn list_functions(&self) -> gridflow_cloud::Result<Vec<FunctionSummary>> {
        let entries = self.cli.list_functions().await.map_err(provider_err)?;
        Ok(entries
            .into_iter()
            .map(|entry| FunctionSummary {
                name: entry.function_name,
                runtime: entry.runtime.unwrap_or_else(|| "-".to_string()),
                code_size: entry.code_size,
                last_modified: entry.last_modified,
            })
            .collect())
    }

    async fn create_function(&self, config: &FunctionConfig) -> gridflow_cloud::Result<()> {
        self.cli
            .create_function(
                &config.name,
                &config.handler,
                &config.runtime,
                &config.role,
                config.timeout_secs,
                config.memory_mb,
                &config.archive,
            )
            .await
            .map_err(provider_err)
    }

    async fn update_function_code(&self, name: &str, archive: &Path) -> gridflow_cloud::Result<()> {
        self.cli
            .update_function_code(name, archive)
            .await
            .map_err(provider_err)
    }

    async fn delete_function(&self, name: &str) -> gridflow_cloud::Result<()> {
        self.cli.delete_function(name).await.map_err(provider_err)
    }
}
