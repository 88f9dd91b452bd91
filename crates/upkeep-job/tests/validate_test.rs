//! End-to-end tests for job spec validation and binding.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use upkeep_job::{ValidateError, canonical_pipeline, validate_keeper_spec};
use upkeep_pipeline::TaskKind;

const SPEC: &str = r#"
type = "keeper"
schemaVersion = 1
name = "mainnet contract upkeep"
contractAddress = "0x7b3EC232b08BD7b4b3305BE0C044D907B2DF960B"
fromAddress = "0xa8037A20989AFcBC51798de9762b351D63ff462e"
chainID = 1
gasPrice = 20000000000
gasTipCap = 1000000000
gasFeeCap = 30000000000
checkGasLimit = 650000
performGasLimit = 2500000
upkeepID = 7
prettyID = "UPx0000000000000007"
"#;

#[test]
fn valid_spec_binds_a_job() {
  let job = validate_keeper_spec(SPEC).unwrap();

  assert!(!job.external_job_id.is_nil());
  assert_eq!(job.schema_version, 1);
  assert_eq!(job.name.as_deref(), Some("mainnet contract upkeep"));
  assert_eq!(job.keeper.chain_id, 1);
  assert_eq!(job.keeper.upkeep_id, 7);
  assert_eq!(
    job.keeper.contract_address.as_str(),
    "0x7b3EC232b08BD7b4b3305BE0C044D907B2DF960B"
  );
  assert_eq!(job.keeper.check_gas_limit, 650_000);
}

#[test]
fn bound_job_shares_the_canonical_pipeline() {
  let job = validate_keeper_spec(SPEC).unwrap();
  assert!(Arc::ptr_eq(&job.pipeline, &canonical_pipeline()));

  let graph = job.pipeline.graph();
  let terminal = &graph.terminal_points()[0];
  assert_eq!(
    job.pipeline.node(terminal).unwrap().kind,
    TaskKind::SubmitTransaction
  );
}

#[test]
fn external_ids_are_unique_per_bind() {
  let first = validate_keeper_spec(SPEC).unwrap();
  let second = validate_keeper_spec(SPEC).unwrap();
  assert_ne!(first.external_job_id, second.external_job_id);
}

#[test]
fn pipeline_override_is_rejected() {
  let spec = format!("{SPEC}observationSource = \"a -> b\"\n");
  let err = validate_keeper_spec(&spec).unwrap_err();
  assert!(matches!(err, ValidateError::ForbiddenField));
}

#[test]
fn pipeline_override_wins_over_a_parse_failure() {
  // Not even valid TOML, but the override key is present anywhere in the
  // raw text, so that is the error reported.
  let err = validate_keeper_spec("observationSource = = =").unwrap_err();
  assert!(matches!(err, ValidateError::ForbiddenField));
}

#[test]
fn override_key_in_a_string_value_still_rejects() {
  // The containment check is textual, not structural.
  let spec = SPEC.replace("mainnet contract upkeep", "observationSource goes here");
  let err = validate_keeper_spec(&spec).unwrap_err();
  assert!(matches!(err, ValidateError::ForbiddenField));
}

#[test]
fn unsupported_job_type_names_the_type() {
  let spec = SPEC.replace("type = \"keeper\"", "type = \"other\"");
  let err = validate_keeper_spec(&spec).unwrap_err();
  let ValidateError::UnsupportedType(declared) = err else {
    panic!("expected unsupported type error");
  };
  assert_eq!(declared, "other");
}

#[test]
fn unsupported_type_error_message_names_the_type() {
  let spec = SPEC.replace("type = \"keeper\"", "type = \"fluxmonitor\"");
  let err = validate_keeper_spec(&spec).unwrap_err();
  assert!(err.to_string().contains("fluxmonitor"));
}

#[test]
fn missing_type_is_reported() {
  let spec = SPEC.replace("type = \"keeper\"\n", "");
  let err = validate_keeper_spec(&spec).unwrap_err();
  assert!(matches!(err, ValidateError::MissingField("type")));
}

#[test]
fn malformed_document_is_a_parse_error() {
  let err = validate_keeper_spec("type = ").unwrap_err();
  assert!(matches!(err, ValidateError::Parse(_)));
}

#[test]
fn missing_required_field_is_a_binding_error() {
  let spec = SPEC.replace("gasPrice = 20000000000\n", "");
  let err = validate_keeper_spec(&spec).unwrap_err();
  assert!(matches!(err, ValidateError::Field(_)));
}

#[test]
fn invalid_address_is_a_binding_error() {
  let spec = SPEC.replace("0x7b3EC232b08BD7b4b3305BE0C044D907B2DF960B", "0x1234");
  let err = validate_keeper_spec(&spec).unwrap_err();
  assert!(matches!(err, ValidateError::Field(_)));
}

#[test]
fn gas_amounts_accept_decimal_strings() {
  // Amounts past TOML's integer range are written as strings.
  let spec = SPEC.replace("gasFeeCap = 30000000000", "gasFeeCap = \"30000000000000000000\"");
  let job = validate_keeper_spec(&spec).unwrap();
  assert_eq!(job.keeper.gas_fee_cap.to_string(), "30000000000000000000");
}

#[test]
fn bound_job_serializes_to_json() {
  let job = validate_keeper_spec(SPEC).unwrap();
  let json = serde_json::to_value(&job).unwrap();

  assert_eq!(json["schemaVersion"], 1);
  assert_eq!(json["keeper"]["chainID"], 1);
  assert_eq!(json["externalJobID"], job.external_job_id.to_string());
  assert_eq!(json["pipeline"]["nodes"][0]["name"], "encode_check_upkeep");
}

#[test]
fn external_id_in_the_input_is_ignored() {
  let spec = format!("{SPEC}externalJobID = \"52123f22-2b05-4788-b190-d2b9eea7d7a1\"\n");
  let job = validate_keeper_spec(&spec).unwrap();
  assert_ne!(
    job.external_job_id.to_string(),
    "52123f22-2b05-4788-b190-d2b9eea7d7a1"
  );
}
