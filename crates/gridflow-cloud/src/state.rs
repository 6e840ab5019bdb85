//! Cluster lifecycle states
//!
//! State names are the provider's verbatim strings. Transitions are
//! observed, never driven: the controller only issues the initial create
//! or terminate call and then watches.

/// Remote state of a cluster as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterState {
    Pending,
    Starting,
    Bootstrapping,
    Running,
    Waiting,
    Terminating,
    Terminated,
    TerminatedWithErrors,
    /// A state string this build does not know. Kept verbatim; treated as
    /// non-terminal so the poll loop keeps watching.
    Other(String),
}

impl ClusterState {
    /// No further transition is expected from these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClusterState::Terminated | ClusterState::TerminatedWithErrors)
    }

    /// The cluster accepts work.
    pub fn is_ready(&self) -> bool {
        matches!(self, ClusterState::Waiting | ClusterState::Running)
    }
}

impl From<&str> for ClusterState {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => ClusterState::Pending,
            "STARTING" => ClusterState::Starting,
            "BOOTSTRAPPING" => ClusterState::Bootstrapping,
            "RUNNING" => ClusterState::Running,
            "WAITING" => ClusterState::Waiting,
            "TERMINATING" => ClusterState::Terminating,
            "TERMINATED" => ClusterState::Terminated,
            "TERMINATED_WITH_ERRORS" => ClusterState::TerminatedWithErrors,
            other => ClusterState::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterState::Pending => write!(f, "PENDING"),
            ClusterState::Starting => write!(f, "STARTING"),
            ClusterState::Bootstrapping => write!(f, "BOOTSTRAPPING"),
            ClusterState::Running => write!(f, "RUNNING"),
            ClusterState::Waiting => write!(f, "WAITING"),
            ClusterState::Terminating => write!(f, "TERMINATING"),
            ClusterState::Terminated => write!(f, "TERMINATED"),
            ClusterState::TerminatedWithErrors => write!(f, "TERMINATED_WITH_ERRORS"),
            ClusterState::Other(s) => write!(f, "{s}"),
        }
    }
}
