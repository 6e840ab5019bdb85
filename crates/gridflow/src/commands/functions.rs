use gridflow_cloud::{FunctionConfig, FunctionProvider};
use gridflow_config::Settings;
use std::path::Path;
use tracing::info;

pub async fn list(provider: &dyn FunctionProvider) -> anyhow::Result<()> {
    let functions = provider.list_functions().await?;

    if functions.is_empty() {
        println!("No functions deployed.");
        return Ok(());
    }

    for func in functions {
        println!(
            "{}\t{}\t{}\t{}",
            func.code_size, func.last_modified, func.runtime, func.name
        );
    }
    Ok(())
}

/// Create the function, or only replace its code if it already exists.
pub async fn deploy(
    settings: &Settings,
    provider: &dyn FunctionProvider,
    name: &str,
    handler: &str,
    archive: &Path,
) -> anyhow::Result<()> {
    if !archive.exists() {
        anyhow::bail!("archive {} does not exist", archive.display());
    }

    let exists = provider
        .list_functions()
        .await?
        .iter()
        .any(|func| func.name == name);

    if exists {
        info!(name, "Updating function code");
        provider.update_function_code(name, archive).await?;
    } else {
        let role = settings
            .lambda_role
            .clone()
            .ok_or_else(|| anyhow::anyhow!("deploy requires GRIDFLOW_LAMBDA_ROLE to be set"))?;
        info!(name, "Creating function");
        provider
            .create_function(&FunctionConfig {
                name: name.to_string(),
                handler: handler.to_string(),
                runtime: settings.lambda_runtime.clone(),
                role,
                timeout_secs: settings.lambda_timeout_secs,
                memory_mb: settings.lambda_memory_mb,
                archive: archive.to_path_buf(),
            })
            .await?;
    }

    info!(name, "Deploy complete");
    Ok(())
}

pub async fn delete(provider: &dyn FunctionProvider, name: &str) -> anyhow::Result<()> {
    provider.delete_function(name).await?;
    info!(name, "Function deleted");
    Ok(())
}
