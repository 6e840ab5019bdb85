use colored::Colorize;
use gridflow_cloud::{ClusterController, StepDispatcher};

pub fn handle(controller: &ClusterController, dispatcher: &StepDispatcher) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "Cluster templates..:".bold(),
        controller.template_names().join(", ")
    );
    println!(
        "{} {}",
        "Step templates.....:".bold(),
        dispatcher.step_names().join(", ")
    );
    println!(
        "{} {}",
        "Bootstrap templates:".bold(),
        dispatcher.bootstrap_names().join(", ")
    );
    Ok(())
}
