use colored::Colorize;
use gridflow_cloud::ClusterController;

pub async fn handle(controller: &ClusterController) -> anyhow::Result<()> {
    let active = controller.list_active().await?;

    if active.is_empty() {
        println!("No active clusters.");
        return Ok(());
    }

    for cluster in active {
        println!(
            "{}  {:<12}  {}",
            cluster.id.to_string().cyan(),
            cluster.state.to_string(),
            cluster.name
        );
    }
    Ok(())
}
