//! Upkeep Chains
//!
//! In-memory table of per-chain default operational parameters, with a
//! deterministic serialization pinned by per-chain fixture files. The table
//! is built once and read-only; nothing here loads runtime configuration.

mod defaults;
mod export;

pub use defaults::{
  ChainDefaults, ChainType, chain_defaults, fallback_defaults, supported_chain_ids,
};
pub use export::{format_duration, parse_duration};
