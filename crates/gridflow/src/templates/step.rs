//! Step templates
//!
//! Steps run a gridflow task executable on the master node through
//! command-runner. The notify step is also available as a generator so
//! cluster templates can embed it with per-call-site flags.

use gridflow_config::Settings;
use gridflow_core::{Generator, Node, Params};
use serde_json::json;
use std::sync::Arc;

/// Build a step document that runs a gridflow task executable.
///
/// `on_failure` is either `CONTINUE` or `TERMINATE_CLUSTER`.
pub fn step_task<I, S>(name: &str, task: &str, args: I, on_failure: &str) -> Node
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut step_args = vec![format!("/usr/local/bin/{task}")];
    step_args.extend(args.into_iter().map(Into::into));

    Node::from(json!({
        "Name": name,
        "ActionOnFailure": on_failure,
        "HadoopJarStep": {
            "Jar": "command-runner.jar",
            "Args": step_args,
        }
    }))
}

/// Install Jupyter with S3 notebook persistence.
pub fn jupyter_s3() -> Node {
    step_task(
        "jupyter-s3",
        "gridflow-add-jupyter",
        ["--bucket", "{s3bucket}", "--prefix", "{s3prefix}/jupyter"],
        "TERMINATE_CLUSTER",
    )
}

/// Install Jupyter without notebook persistence.
pub fn jupyter_local() -> Node {
    step_task(
        "jupyter-local",
        "gridflow-add-jupyter",
        std::iter::empty::<&str>(),
        "TERMINATE_CLUSTER",
    )
}

/// Announce a cluster event to the notification sink.
pub fn notify() -> Node {
    NotifyStep::new(std::iter::empty::<&str>()).step()
}

/// Re-install the gridflow toolkit at a given version.
pub fn update_gridflow(settings: &Settings) -> Node {
    step_task(
        "update-gridflow",
        "gridflow-update",
        ["--package".to_string(), settings.package_uri("{version}")],
        "CONTINUE",
    )
}

/// Notification step with call-site flags.
///
/// Embedded in cluster templates as a generator node: each embedding picks
/// its own flags, and the produced document is substituted verbatim at
/// resolution time.
pub struct NotifyStep {
    flags: Vec<String>,
}

impl NotifyStep {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    fn step(&self) -> Node {
        step_task(
            "notify",
            "gridflow-notify",
            self.flags.iter().map(String::as_str),
            "CONTINUE",
        )
    }

    pub fn into_node(self) -> Node {
        Node::Generator(Arc::new(self))
    }
}

impl Generator for NotifyStep {
    fn produce(&self, _params: &Params) -> gridflow_core::Result<Node> {
        Ok(self.step())
    }
}
