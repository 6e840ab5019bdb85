//! Gridflow template engine
//!
//! Named, deeply nested configuration documents (cluster definitions,
//! post-provisioning steps, bootstrap actions) are registered once at
//! process start and resolved on demand against a set of `key=value`
//! parameters. Resolution always produces an independent document, so a
//! registered template is never mutated.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              TemplateRegistry                 │
//! │   name ──▶ Node (Map | Seq | Str | Int |     │
//! │                   Bool | Null | Generator)    │
//! └───────────────┬──────────────────────────────┘
//!                 │ get(name, ["key=value", ...])
//! ┌───────────────▼──────────────────────────────┐
//! │   parse_params  ──▶  resolve(doc, params)    │
//! │   (integer coercion)  ({name} substitution,   │
//! │                        generator invocation)  │
//! └──────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod node;
pub mod params;
pub mod registry;
pub mod resolve;

// Re-exports
pub use error::{Result, TemplateError};
pub use node::{Generator, Node};
pub use params::{ParamValue, Params, parse_params};
pub use registry::TemplateRegistry;
pub use resolve::resolve;
