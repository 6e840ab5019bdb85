//! Step dispatch
//!
//! Resolves a named step or bootstrap template against caller-supplied
//! parameters and hands the resolved document to the provider. No state of
//! its own.

use crate::error::Result;
use crate::provider::{ClusterId, ClusterProvider};
use gridflow_core::{Node, TemplateRegistry};
use std::sync::Arc;
use tracing::info;

pub struct StepDispatcher {
    provider: Arc<dyn ClusterProvider>,
    steps: TemplateRegistry,
    bootstraps: TemplateRegistry,
}

impl StepDispatcher {
    pub fn new(
        provider: Arc<dyn ClusterProvider>,
        steps: TemplateRegistry,
        bootstraps: TemplateRegistry,
    ) -> Self {
        Self {
            provider,
            steps,
            bootstraps,
        }
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.names()
    }

    pub fn bootstrap_names(&self) -> Vec<&str> {
        self.bootstraps.names()
    }

    /// Resolve a step template and submit it to a running cluster.
    pub async fn submit_step(
        &self,
        cluster_id: &ClusterId,
        template: &str,
        raw_params: &[String],
    ) -> Result<String> {
        let doc = self.steps.get(template, raw_params)?;
        let step_id = self
            .provider
            .submit_step(cluster_id, &doc.to_json()?)
            .await?;
        info!(cluster_id = %cluster_id, step_id = %step_id, template, "Added step");
        Ok(step_id)
    }

    /// Resolve a step template without submitting it.
    pub fn render_step(&self, template: &str, raw_params: &[String]) -> Result<Node> {
        Ok(self.steps.get(template, raw_params)?)
    }

    /// Resolve a bootstrap template, for inclusion in a cluster document's
    /// bootstrap-actions list or for inspection.
    pub fn render_bootstrap(&self, template: &str, raw_params: &[String]) -> Result<Node> {
        Ok(self.bootstraps.get(template, raw_params)?)
    }
}
