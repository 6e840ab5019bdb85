use crate::{notify, ssh};
use gridflow_cloud::{ClusterController, ClusterId, ClusterProvider, CreateOutcome};
use gridflow_config::Settings;

#[allow(clippy::too_many_arguments)]
pub async fn handle(
    settings: &Settings,
    controller: &ClusterController,
    provider: &dyn ClusterProvider,
    cluster: Option<&str>,
    id: Option<&str>,
    params: &[String],
    wait: bool,
    tunnel: bool,
) -> anyhow::Result<()> {
    // An explicit --id wins: resume watching that cluster, skip creation.
    let outcome: CreateOutcome = match (cluster, id) {
        (_, Some(id)) => controller.attach(ClusterId::from(id), wait).await?,
        (Some(template), None) => controller.create(template, params, wait).await?,
        (None, None) => anyhow::bail!("create requires --cluster or --id"),
    };

    let message = match &outcome.state {
        Some(state) if state.is_ready() => {
            format!("Cluster `{}` is up ({state})", outcome.cluster_id)
        }
        Some(state) => format!("Cluster `{}` ended in {state}", outcome.cluster_id),
        None => format!("Cluster `{}` is being created", outcome.cluster_id),
    };
    notify::post(settings, &message).await;

    if tunnel {
        ssh::tunnel_loop(settings, provider, &outcome.cluster_id).await?;
    }
    Ok(())
}
