//! Built-in template documents
//!
//! The fixed set of cluster, step and bootstrap templates this build
//! ships. Registries are populated once here at startup and read-only for
//! the rest of the process; a duplicate name is a packaging bug that fails
//! immediately.

pub mod bootstrap;
pub mod cluster;
pub mod step;

use gridflow_config::Settings;
use gridflow_core::TemplateRegistry;

/// The three template registries, one per document class.
pub struct Registries {
    pub clusters: TemplateRegistry,
    pub steps: TemplateRegistry,
    pub bootstraps: TemplateRegistry,
}

impl Registries {
    /// Build the built-in registries.
    pub fn builtin(settings: &Settings) -> gridflow_core::Result<Self> {
        let mut clusters = TemplateRegistry::new();
        clusters.register(cluster::crunch(settings))?;
        clusters.register(cluster::cheap(settings))?;

        let mut steps = TemplateRegistry::new();
        steps.register(step::jupyter_s3())?;
        steps.register(step::jupyter_local())?;
        steps.register(step::notify())?;
        steps.register(step::update_gridflow(settings))?;

        let mut bootstraps = TemplateRegistry::new();
        bootstraps.register(bootstrap::install_gridflow(settings))?;

        Ok(Self {
            clusters,
            steps,
            bootstraps,
        })
    }
}
