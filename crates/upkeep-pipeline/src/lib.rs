//! Upkeep Pipeline
//!
//! Task graph model for upkeep automation pipelines: a directed acyclic
//! graph of typed steps with parameter interpolation and fail-fast
//! semantics, parsed from a small DSL.
//!
//! This crate only models and validates graphs. Executing them (the chain
//! calls, the transaction hand-off) belongs to the execution runtime;
//! interpolation references are preserved verbatim for it to resolve.

mod error;
mod graph;
mod node;
mod parse;
mod pipeline;

pub use error::PipelineError;
pub use graph::Graph;
pub use node::{AttrValue, INPUT_NAMESPACE, Reference, TaskKind, TaskNode};
pub use pipeline::Pipeline;
