use gridflow_cloud::{ClusterId, StepDispatcher};

pub async fn handle(
    dispatcher: &StepDispatcher,
    template: &str,
    params: &[String],
    id: &str,
) -> anyhow::Result<()> {
    let step_id = dispatcher
        .submit_step(&ClusterId::from(id), template, params)
        .await?;
    println!("Added step {step_id}");
    Ok(())
}
