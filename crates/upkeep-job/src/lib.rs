//! Upkeep Job
//!
//! Validation and materialization of upkeep job specifications. An
//! untrusted TOML document comes in; a bound [`Job`] comes out, carrying a
//! fresh external id and a shared reference to the canonical pipeline
//! template. Specs that try to override the template are rejected outright.

mod error;
mod job;
mod template;
mod validate;

pub use error::ValidateError;
pub use job::{Address, AddressError, Job, JobDocument, JobType, KeeperDocument, KeeperSpec};
pub use template::{UPKEEP_PIPELINE, UPKEEP_PIPELINE_V1, canonical_pipeline};
pub use validate::{FORBIDDEN_OVERRIDE_KEY, validate_keeper_spec, validate_keeper_spec_with};
