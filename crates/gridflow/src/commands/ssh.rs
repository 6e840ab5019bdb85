use crate::ssh;
use gridflow_cloud::{ClusterId, ClusterProvider};
use gridflow_config::Settings;

pub async fn handle(
    settings: &Settings,
    provider: &dyn ClusterProvider,
    id: &str,
    cmd: &str,
) -> anyhow::Result<()> {
    let dns = ssh::master_dns(provider, &ClusterId::from(id)).await?;
    ssh::shell(settings, &dns, cmd).await
}
