use crate::notify;
use gridflow_cloud::{ClusterController, ClusterId};
use gridflow_config::Settings;

pub async fn handle(
    settings: &Settings,
    controller: &ClusterController,
    id: &str,
) -> anyhow::Result<()> {
    let state = controller.terminate(&ClusterId::from(id)).await?;
    notify::post(settings, &format!("Cluster `{id}` terminated ({state})")).await;
    Ok(())
}
