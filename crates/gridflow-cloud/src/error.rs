//! Cloud layer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    /// Any failure of the underlying provider call (network, auth, quota,
    /// missing binary). Never retried here; the operator re-invokes the
    /// command against provider-held state.
    #[error("Provider call failed: {0}")]
    Provider(String),

    #[error("Timed out waiting for cluster {cluster_id} after {attempts} polls")]
    Timeout { cluster_id: String, attempts: u32 },

    #[error("Template error: {0}")]
    Template(#[from] gridflow_core::TemplateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
