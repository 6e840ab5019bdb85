//! Cluster lifecycle controller
//!
//! Drives cluster creation or attachment and polls remote state at a fixed
//! cadence until a target or terminal state is reached. The controller
//! observes transitions, it does not drive them; crashing mid-poll loses
//! nothing, because the cluster's existence lives in the provider and a
//! fresh invocation with the same id simply resumes watching.

use crate::error::{CloudError, Result};
use crate::provider::{ClusterId, ClusterProvider, ClusterSummary};
use crate::state::ClusterState;
use gridflow_core::{Node, TemplateRegistry};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::info;

/// Service UIs exposed on the master node, on well-known ports.
pub const SERVICE_PORTS: &[(&str, u16)] = &[
    ("Jupyter Lab", 8888),
    ("Zeppelin", 8890),
    ("Spark History Server", 18080),
    ("Hadoop Resource Manager", 8088),
    ("HDFS Name Node", 50070),
];

/// Endpoint URLs for the master node's service UIs.
pub fn service_endpoints(master_dns: &str) -> Vec<(&'static str, String)> {
    SERVICE_PORTS
        .iter()
        .map(|(label, port)| (*label, format!("http://{master_dns}:{port}/")))
        .collect()
}

/// Polling cadence for lifecycle waits.
///
/// `max_attempts: None` waits indefinitely — provisioning takes many
/// minutes and only the operator knows when to give up. Supplying a cap
/// turns an exhausted wait into [`CloudError::Timeout`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: None,
        }
    }
}

/// Result of a create or attach call.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub cluster_id: ClusterId,
    /// Final observed state; `None` when the caller did not wait.
    pub state: Option<ClusterState>,
}

/// Lifecycle state machine over a cluster handle.
pub struct ClusterController {
    provider: Arc<dyn ClusterProvider>,
    templates: TemplateRegistry,
    poll: PollConfig,
}

impl ClusterController {
    pub fn new(
        provider: Arc<dyn ClusterProvider>,
        templates: TemplateRegistry,
        poll: PollConfig,
    ) -> Self {
        Self {
            provider,
            templates,
            poll,
        }
    }

    /// Registered cluster template names, in registration order.
    pub fn template_names(&self) -> Vec<&str> {
        self.templates.names()
    }

    /// Resolve a cluster template without submitting it.
    pub fn render(&self, template: &str, raw_params: &[String]) -> Result<Node> {
        Ok(self.templates.get(template, raw_params)?)
    }

    /// Create a cluster from a named template and optionally wait for it.
    ///
    /// Reaching a terminal state during the wait is NOT an error: the
    /// cluster terminated instead of becoming ready, and the two outcomes
    /// differ only in what gets logged. Callers that care inspect
    /// [`CreateOutcome::state`].
    pub async fn create(
        &self,
        template: &str,
        raw_params: &[String],
        wait: bool,
    ) -> Result<CreateOutcome> {
        let start = Instant::now();
        let doc = self.templates.get(template, raw_params)?;
        let spec = doc.to_json()?;

        let cluster_id = self.provider.create_cluster(&spec).await?;
        info!(cluster_id = %cluster_id, template, "Creating cluster");

        self.watch(cluster_id, wait, start).await
    }

    /// Attach to an existing cluster and optionally wait for readiness.
    pub async fn attach(&self, cluster_id: ClusterId, wait: bool) -> Result<CreateOutcome> {
        let start = Instant::now();
        info!(cluster_id = %cluster_id, "Monitoring existing cluster");
        self.watch(cluster_id, wait, start).await
    }

    async fn watch(&self, cluster_id: ClusterId, wait: bool, start: Instant) -> Result<CreateOutcome> {
        if !wait {
            info!(cluster_id = %cluster_id, "Cluster is being created");
            return Ok(CreateOutcome {
                cluster_id,
                state: None,
            });
        }

        let state = self
            .poll_until(&cluster_id, &[ClusterState::Waiting, ClusterState::Running])
            .await?;

        if state.is_ready() {
            info!(cluster_id = %cluster_id, "Cluster up and running");
            let region = self.provider.region();
            info!("SSH into master..............: grid ssh --region {region} --id {cluster_id}");
            info!("Start SSH tunnel to master...: grid tunnel --region {region} --id {cluster_id}");

            let desc = self.provider.describe_cluster(&cluster_id).await?;
            if let Some(dns) = desc.master_public_dns {
                for (label, url) in service_endpoints(&dns) {
                    info!("URL {label:.<26}: {url}");
                }
            }
        } else {
            info!(cluster_id = %cluster_id, state = %state, "Cluster terminated");
        }

        info!(
            cluster_id = %cluster_id,
            elapsed_secs = start.elapsed().as_secs(),
            "Create wait finished"
        );
        Ok(CreateOutcome {
            cluster_id,
            state: Some(state),
        })
    }

    /// Terminate a cluster and wait until the provider reports TERMINATED.
    pub async fn terminate(&self, cluster_id: &ClusterId) -> Result<ClusterState> {
        let start = Instant::now();
        self.provider.terminate_cluster(cluster_id).await?;
        info!(cluster_id = %cluster_id, "Terminating cluster");

        // TERMINATED is the requested target; the terminal check also ends
        // the loop on TERMINATED_WITH_ERRORS.
        let state = self
            .poll_until(cluster_id, std::slice::from_ref(&ClusterState::Terminated))
            .await?;

        info!(
            cluster_id = %cluster_id,
            state = %state,
            elapsed_secs = start.elapsed().as_secs(),
            "Cluster terminated"
        );
        Ok(state)
    }

    /// List clusters that are not in a terminal state.
    pub async fn list_active(&self) -> Result<Vec<ClusterSummary>> {
        info!(region = self.provider.region(), "Listing active clusters");

        let clusters = self.provider.list_clusters().await?;
        // Filter on the state string so unrecognised TERMINATED_* variants
        // are dropped too.
        let active: Vec<ClusterSummary> = clusters
            .into_iter()
            .filter(|cluster| !cluster.state.to_string().starts_with("TERMINATED"))
            .collect();

        for cluster in &active {
            info!(
                cluster_id = %cluster.id,
                state = %cluster.state,
                "Cluster is active"
            );
        }
        Ok(active)
    }

    /// Poll the cluster until its state is in `targets` or terminal.
    ///
    /// Each iteration is one describe call plus one logged state line. A
    /// transient describe failure is not retried; it propagates and the
    /// operator re-invokes against provider-held state.
    pub async fn poll_until(
        &self,
        cluster_id: &ClusterId,
        targets: &[ClusterState],
    ) -> Result<ClusterState> {
        let mut attempts: u32 = 0;
        loop {
            let desc = self.provider.describe_cluster(cluster_id).await?;
            let state = desc.state;
            info!(cluster_id = %cluster_id, state = %state, "Cluster state");

            if targets.contains(&state) || state.is_terminal() {
                return Ok(state);
            }

            attempts += 1;
            if let Some(max) = self.poll.max_attempts {
                if attempts >= max {
                    return Err(CloudError::Timeout {
                        cluster_id: cluster_id.to_string(),
                        attempts,
                    });
                }
            }
            sleep(self.poll.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ClusterDescription;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Provider that replays a scripted describe sequence. Once the script
    /// is exhausted the last state repeats.
    struct ScriptedProvider {
        states: Mutex<VecDeque<ClusterState>>,
        last: Mutex<ClusterState>,
        describe_calls: AtomicU32,
        terminate_calls: AtomicU32,
        listing: Vec<ClusterSummary>,
    }

    impl ScriptedProvider {
        fn new(states: &[&str]) -> Self {
            Self {
                states: Mutex::new(states.iter().map(|s| ClusterState::from(*s)).collect()),
                last: Mutex::new(ClusterState::Pending),
                describe_calls: AtomicU32::new(0),
                terminate_calls: AtomicU32::new(0),
                listing: Vec::new(),
            }
        }

        fn with_listing(states: &[&str]) -> Self {
            let mut provider = Self::new(&[]);
            provider.listing = states
                .iter()
                .enumerate()
                .map(|(i, s)| ClusterSummary {
                    id: ClusterId::new(format!("j-{i}")),
                    name: format!("cluster-{i}"),
                    state: ClusterState::from(*s),
                })
                .collect();
            provider
        }
    }

    #[async_trait]
    impl ClusterProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn region(&self) -> &str {
            "eu-central-1"
        }

        async fn create_cluster(&self, _spec: &serde_json::Value) -> Result<ClusterId> {
            Ok(ClusterId::new("j-SCRIPTED"))
        }

        async fn describe_cluster(&self, _id: &ClusterId) -> Result<ClusterDescription> {
            self.describe_calls.fetch_add(1, Ordering::SeqCst);
            let mut last = self.last.lock().unwrap();
            if let Some(state) = self.states.lock().unwrap().pop_front() {
                *last = state;
            }
            Ok(ClusterDescription {
                state: last.clone(),
                master_public_dns: Some("ec2-1-2-3-4.example.com".to_string()),
            })
        }

        async fn terminate_cluster(&self, _id: &ClusterId) -> Result<()> {
            self.terminate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn list_clusters(&self) -> Result<Vec<ClusterSummary>> {
            Ok(self.listing.clone())
        }

        async fn submit_step(&self, _id: &ClusterId, _step: &serde_json::Value) -> Result<String> {
            Ok("s-SCRIPTED".to_string())
        }
    }

    fn controller(provider: Arc<ScriptedProvider>, max_attempts: Option<u32>) -> ClusterController {
        let mut templates = TemplateRegistry::new();
        templates
            .register(Node::from(json!({"Name": "cheap", "LogUri": "{loguri}"})))
            .unwrap();
        ClusterController::new(
            provider,
            templates,
            PollConfig {
                interval: Duration::ZERO,
                max_attempts,
            },
        )
    }

    #[tokio::test]
    async fn test_poll_until_counts_to_ready() {
        let provider = Arc::new(ScriptedProvider::new(&["STARTING", "STARTING", "RUNNING"]));
        let ctl = controller(provider.clone(), None);

        let state = ctl
            .poll_until(
                &ClusterId::new("j-1"),
                &[ClusterState::Waiting, ClusterState::Running],
            )
            .await
            .unwrap();

        assert_eq!(state, ClusterState::Running);
        assert_eq!(provider.describe_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_until_stops_on_terminal() {
        let provider = Arc::new(ScriptedProvider::new(&["STARTING", "TERMINATED"]));
        let ctl = controller(provider.clone(), None);

        let state = ctl
            .poll_until(
                &ClusterId::new("j-1"),
                &[ClusterState::Waiting, ClusterState::Running],
            )
            .await
            .unwrap();

        assert_eq!(state, ClusterState::Terminated);
        assert_eq!(provider.describe_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_waits_to_running() {
        let provider = Arc::new(ScriptedProvider::new(&["STARTING", "STARTING", "RUNNING"]));
        let ctl = controller(provider.clone(), None);

        let outcome = ctl
            .create("cheap", &["loguri=s3://logs/".to_string()], true)
            .await
            .unwrap();

        assert_eq!(outcome.cluster_id, ClusterId::new("j-SCRIPTED"));
        assert_eq!(outcome.state, Some(ClusterState::Running));
    }

    #[tokio::test]
    async fn test_create_terminated_is_not_an_error() {
        let provider = Arc::new(ScriptedProvider::new(&["STARTING", "TERMINATED"]));
        let ctl = controller(provider.clone(), None);

        let outcome = ctl
            .create("cheap", &["loguri=s3://logs/".to_string()], true)
            .await
            .unwrap();

        assert_eq!(outcome.state, Some(ClusterState::Terminated));
        // No readiness describe for the master address on this path.
        assert_eq!(provider.describe_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_without_wait_returns_immediately() {
        let provider = Arc::new(ScriptedProvider::new(&["STARTING"]));
        let ctl = controller(provider.clone(), None);

        let outcome = ctl
            .create("cheap", &["loguri=s3://logs/".to_string()], false)
            .await
            .unwrap();

        assert_eq!(outcome.state, None);
        assert_eq!(provider.describe_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_attach_polls_existing_cluster() {
        let provider = Arc::new(ScriptedProvider::new(&["WAITING"]));
        let ctl = controller(provider.clone(), None);

        let outcome = ctl.attach(ClusterId::new("j-EXISTING"), true).await.unwrap();
        assert_eq!(outcome.cluster_id, ClusterId::new("j-EXISTING"));
        assert_eq!(outcome.state, Some(ClusterState::Waiting));
    }

    #[tokio::test]
    async fn test_terminate_waits_for_terminated() {
        let provider = Arc::new(ScriptedProvider::new(&["TERMINATING", "TERMINATED"]));
        let ctl = controller(provider.clone(), None);

        let state = ctl.terminate(&ClusterId::new("j-1")).await.unwrap();
        assert_eq!(state, ClusterState::Terminated);
        assert_eq!(provider.terminate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.describe_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_terminate_accepts_errored_teardown() {
        let provider = Arc::new(ScriptedProvider::new(&["TERMINATED_WITH_ERRORS"]));
        let ctl = controller(provider.clone(), None);

        let state = ctl.terminate(&ClusterId::new("j-1")).await.unwrap();
        assert_eq!(state, ClusterState::TerminatedWithErrors);
    }

    #[tokio::test]
    async fn test_poll_cap_exceeded_times_out() {
        let provider = Arc::new(ScriptedProvider::new(&["STARTING"]));
        let ctl = controller(provider.clone(), Some(2));

        let err = ctl
            .poll_until(&ClusterId::new("j-1"), &[ClusterState::Running])
            .await
            .unwrap_err();

        assert!(matches!(err, CloudError::Timeout { attempts: 2, .. }));
        assert_eq!(provider.describe_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_list_active_filters_terminated() {
        let provider = Arc::new(ScriptedProvider::with_listing(&[
            "RUNNING",
            "TERMINATED",
            "TERMINATED_WITH_ERRORS",
            "WAITING",
        ]));
        let ctl = controller(provider, None);

        let active = ctl.list_active().await.unwrap();
        let states: Vec<String> = active.iter().map(|c| c.state.to_string()).collect();
        assert_eq!(states, ["RUNNING", "WAITING"]);
    }

    #[test]
    fn test_service_endpoints() {
        let endpoints = service_endpoints("ec2-1-2-3-4.example.com");
        assert_eq!(endpoints.len(), 5);
        assert!(
            endpoints
                .iter()
                .any(|(label, url)| *label == "Jupyter Lab"
                    && url == "http://ec2-1-2-3-4.example.com:8888/")
        );
        assert!(
            endpoints
                .iter()
                .any(|(label, url)| *label == "HDFS Name Node"
                    && url == "http://ec2-1-2-3-4.example.com:50070/")
        );
    }
}
