use thiserror::Error;

/// Recoverable validation failures.
///
/// A defect in the built-in pipeline template is not represented here: it
/// panics during template initialization instead, since no caller input can
/// cause or work around it.
#[derive(Debug, Error)]
pub enum ValidateError {
  #[error("job spec is not valid TOML: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("observationSource may not be set on an upkeep job; the pipeline is fixed")]
  ForbiddenField,

  #[error("unsupported job type {0}")]
  UnsupportedType(String),

  #[error("missing required field {0}")]
  MissingField(&'static str),

  #[error("invalid job field: {0}")]
  Field(#[source] toml::de::Error),
}
