use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use upkeep_pipeline::Pipeline;

use crate::error::ValidateError;

/// Job type discriminator. Only upkeep automation jobs are accepted here;
/// the enum exists so further variants slot in beside their own spec types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
  Keeper,
}

impl JobType {
  pub fn as_str(&self) -> &'static str {
    match self {
      JobType::Keeper => "keeper",
    }
  }
}

impl fmt::Display for JobType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
#[error("invalid address {0:?}: expected 0x followed by 40 hex digits")]
pub struct AddressError(String);

/// A checksummed-or-not contract/account address, validated at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl FromStr for Address {
  type Err = AddressError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.strip_prefix("0x") {
      Some(hex) if hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
        Ok(Address(s.to_string()))
      }
      _ => Err(AddressError(s.to_string())),
    }
  }
}

impl fmt::Display for Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for Address {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

/// The upkeep-specific fields of a keeper job spec.
///
/// Gas amounts are decimals so specs may write them either as TOML integers
/// or, for amounts past the integer range, as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeeperSpec {
  pub contract_address: Address,
  pub from_address: Address,
  #[serde(rename = "chainID")]
  pub chain_id: u64,
  pub gas_price: Decimal,
  pub gas_tip_cap: Decimal,
  pub gas_fee_cap: Decimal,
  pub check_gas_limit: u64,
  pub perform_gas_limit: u64,
  #[serde(rename = "upkeepID")]
  pub upkeep_id: u64,
  #[serde(rename = "prettyID")]
  pub pretty_id: String,
}

/// The full document for a keeper job: generic job fields plus the keeper
/// spec, decoded in one pass.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeeperDocument {
  #[serde(rename = "type")]
  pub job_type: JobType,
  pub schema_version: u32,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(flatten)]
  pub keeper: KeeperSpec,
}

/// A parsed job document, discriminated by its declared type. Each variant
/// owns its required-field set.
#[derive(Debug)]
pub enum JobDocument {
  Keeper(KeeperDocument),
}

impl JobDocument {
  /// Two-pass decode: read the type discriminator, then deserialize the
  /// matched variant's full field set.
  pub fn decode(table: toml::Table) -> Result<JobDocument, ValidateError> {
    let declared = match table.get("type") {
      None => return Err(ValidateError::MissingField("type")),
      Some(value) => match value.as_str() {
        Some(s) => s.to_string(),
        None => return Err(ValidateError::UnsupportedType(value.to_string())),
      },
    };

    match declared.as_str() {
      t if t == JobType::Keeper.as_str() => {
        let doc: KeeperDocument = table.try_into().map_err(ValidateError::Field)?;
        Ok(JobDocument::Keeper(doc))
      }
      other => Err(ValidateError::UnsupportedType(other.to_string())),
    }
  }
}

/// A bound, immutable job.
///
/// The external id is generated fresh on every successful bind and never
/// taken from the input. The pipeline is a shared read-only reference to
/// the process-wide template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
  #[serde(rename = "externalJobID")]
  pub external_job_id: Uuid,
  pub schema_version: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  pub keeper: KeeperSpec,
  pub pipeline: Arc<Pipeline>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn address_accepts_canonical_form() {
    let addr: Address = "0x514910771AF9Ca656af840dff83E8264EcF986CA".parse().unwrap();
    assert_eq!(addr.as_str(), "0x514910771AF9Ca656af840dff83E8264EcF986CA");
  }

  #[test]
  fn address_rejects_bad_forms() {
    assert!("514910771AF9Ca656af840dff83E8264EcF986CA".parse::<Address>().is_err());
    assert!("0x1234".parse::<Address>().is_err());
    assert!("0xZZ4910771AF9Ca656af840dff83E8264EcF986CA".parse::<Address>().is_err());
  }

  #[test]
  fn job_type_displays_its_wire_name() {
    assert_eq!(JobType::Keeper.to_string(), "keeper");
  }
}
