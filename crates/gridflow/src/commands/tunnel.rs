use crate::ssh;
use gridflow_cloud::{ClusterId, ClusterProvider};
use gridflow_config::Settings;

pub async fn handle(
    settings: &Settings,
    provider: &dyn ClusterProvider,
    id: &str,
) -> anyhow::Result<()> {
    ssh::tunnel_loop(settings, provider, &ClusterId::from(id)).await
}
