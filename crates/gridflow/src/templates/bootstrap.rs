//! Bootstrap templates
//!
//! Bootstrap actions run on every node before applications start.

use gridflow_config::Settings;
use gridflow_core::Node;
use serde_json::json;

/// Bootstrap block running a chain of bash commands.
pub fn bootstrap_bash(name: &str, commands: &[String]) -> Node {
    Node::from(json!({
        "Name": name,
        "ScriptBootstrapAction": {
            "Path": "file:///bin/bash",
            "Args": ["-c", commands.join(" && ")],
        }
    }))
}

/// Install the gridflow toolkit (the on-cluster task executables) from S3.
pub fn install_gridflow(settings: &Settings) -> Node {
    let package = settings.package_uri(env!("CARGO_PKG_VERSION"));
    bootstrap_bash(
        "install-gridflow",
        &[
            format!("aws s3 cp {package} /tmp/gridflow-tools.tar.gz"),
            "sudo tar -xzf /tmp/gridflow-tools.tar.gz -C /usr/local".to_string(),
        ],
    )
}
