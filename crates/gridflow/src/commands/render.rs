use colored::Colorize;
use gridflow_cloud::{ClusterController, StepDispatcher};
use gridflow_core::Node;

pub fn handle(
    controller: &ClusterController,
    dispatcher: &StepDispatcher,
    cluster: Option<&str>,
    step: Option<&str>,
    bootstrap: Option<&str>,
    params: &[String],
) -> anyhow::Result<()> {
    let (doc, kind): (Node, &str) = if let Some(name) = cluster {
        (controller.render(name, params)?, "Cluster")
    } else if let Some(name) = bootstrap {
        (dispatcher.render_bootstrap(name, params)?, "Bootstrap")
    } else if let Some(name) = step {
        (dispatcher.render_step(name, params)?, "Step")
    } else {
        anyhow::bail!("render requires either --cluster, --bootstrap, or --step");
    };

    println!("{} template:\n", kind.bold());
    println!("{}", serde_json::to_string_pretty(&doc.to_json()?)?);
    Ok(())
}
