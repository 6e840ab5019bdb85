//! SSH helpers for the cluster master node
//!
//! Thin shell-outs to the system `ssh`. Host keys are not checked: master
//! nodes are ephemeral and their addresses are recycled constantly.

use gridflow_cloud::{ClusterId, ClusterProvider};
use gridflow_config::Settings;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

const SSH_OPTS: &[&str] = &[
    "-F",
    "/dev/null",
    "-o",
    "ConnectTimeout=5",
    "-o",
    "UserKnownHostsFile=/dev/null",
    "-o",
    "StrictHostKeyChecking=no",
];

/// Local port the SOCKS tunnel listens on.
const TUNNEL_PORT: u16 = 8157;

/// Resolve the master node's public address.
pub async fn master_dns(
    provider: &dyn ClusterProvider,
    cluster_id: &ClusterId,
) -> anyhow::Result<String> {
    provider
        .describe_cluster(cluster_id)
        .await?
        .master_public_dns
        .ok_or_else(|| anyhow::anyhow!("cluster {cluster_id} has no public master address yet"))
}

fn keyfile(settings: &Settings) -> String {
    // The shell is not involved, expand ~ ourselves.
    match settings.ssh_key_path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest).display().to_string())
            .unwrap_or_else(|| settings.ssh_key_path.clone()),
        None => settings.ssh_key_path.clone(),
    }
}

/// Open an SSH shell (or run one remote command) on the master node.
pub async fn shell(settings: &Settings, master_dns: &str, cmd: &str) -> anyhow::Result<()> {
    let mut command = Command::new("ssh");
    command
        .args(SSH_OPTS)
        .arg("-i")
        .arg(keyfile(settings))
        .arg(format!("hadoop@{master_dns}"));
    if !cmd.is_empty() {
        command.arg(cmd);
    }

    let status = command.status().await?;
    if !status.success() {
        anyhow::bail!("ssh exited with {status}");
    }
    Ok(())
}

/// Keep a SOCKS tunnel open to the master node, reconnecting when the
/// connection drops. Runs until the operator interrupts.
pub async fn tunnel_loop(
    settings: &Settings,
    provider: &dyn ClusterProvider,
    cluster_id: &ClusterId,
) -> anyhow::Result<()> {
    info!(
        cluster_id = %cluster_id,
        port = TUNNEL_PORT,
        "Starting SOCKS tunnel; interrupt to stop"
    );

    loop {
        // Re-resolve each round: the address changes if the cluster was
        // recreated under the same id request.
        let dns = master_dns(provider, cluster_id).await?;

        let status = Command::new("ssh")
            .args(SSH_OPTS)
            .arg("-i")
            .arg(keyfile(settings))
            .arg("-ND")
            .arg(format!("0.0.0.0:{TUNNEL_PORT}"))
            .arg(format!("hadoop@{dns}"))
            .status()
            .await?;

        warn!(%status, "Tunnel closed, reconnecting");
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
