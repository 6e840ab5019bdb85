//! Gridflow cloud infrastructure
//!
//! This crate provides the cluster provider abstraction and the lifecycle
//! controller that drives cluster creation, polling and teardown.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  Gridflow CLI                    │
//! │        (grid create/terminate/step/...)          │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                gridflow-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        Provider Abstraction               │   │
//! │  │  trait ClusterProvider { ... }            │   │
//! │  │  trait FunctionProvider { ... }           │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌────────────────────┐  ┌────────────────┐    │
//! │  │ ClusterController  │  │ StepDispatcher │    │
//! │  │ (create/poll/stop) │  │ (resolve+submit)│   │
//! │  └────────────────────┘  └────────────────┘    │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │             gridflow-cloud-aws                   │
//! │           (EMR / Lambda provider)                │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod provider;
pub mod state;

// Re-exports
pub use dispatch::StepDispatcher;
pub use error::{CloudError, Result};
pub use lifecycle::{ClusterController, CreateOutcome, PollConfig, service_endpoints};
pub use provider::{
    ClusterDescription, ClusterId, ClusterProvider, ClusterSummary, FunctionConfig,
    FunctionProvider, FunctionSummary,
};
pub use state::ClusterState;
