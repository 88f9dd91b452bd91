use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use upkeep_pipeline::Pipeline;

use crate::error::ValidateError;
use crate::job::{Job, JobDocument};
use crate::template;

/// Key a job spec may not set: the pipeline is the process-wide template.
///
/// Checked by containment on the raw text, before parsing. Deliberately
/// conservative: the key appearing anywhere in the document rejects it,
/// and a document that is both malformed and contains the key reports the
/// override, not the parse failure.
pub const FORBIDDEN_OVERRIDE_KEY: &str = "observationSource";

/// Validate a TOML keeper job spec and bind it against the canonical
/// pipeline template.
pub fn validate_keeper_spec(raw: &str) -> Result<Job, ValidateError> {
  validate_keeper_spec_with(raw, template::canonical_pipeline())
}

/// As [`validate_keeper_spec`], with the pipeline template supplied by the
/// caller.
pub fn validate_keeper_spec_with(
  raw: &str,
  pipeline: Arc<Pipeline>,
) -> Result<Job, ValidateError> {
  if raw.contains(FORBIDDEN_OVERRIDE_KEY) {
    return Err(ValidateError::ForbiddenField);
  }

  let table: toml::Table = toml::from_str(raw)?;
  let JobDocument::Keeper(doc) = JobDocument::decode(table)?;

  let job = Job {
    external_job_id: Uuid::new_v4(),
    schema_version: doc.schema_version,
    name: doc.name,
    keeper: doc.keeper,
    pipeline,
  };
  debug!(
    id = %job.external_job_id,
    upkeep = job.keeper.upkeep_id,
    chain = job.keeper.chain_id,
    "bound keeper job spec"
  );
  Ok(job)
}
