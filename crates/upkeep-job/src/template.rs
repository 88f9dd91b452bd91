//! The built-in upkeep pipeline templates.
//!
//! The template is a build-time constant shared by every keeper job; specs
//! cannot override it. Two versions exist: the first-generation linear
//! pipeline and the canonical one, which dry-runs the perform call and
//! gates submission on the simulated outcome so a transaction that would
//! revert is never broadcast.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use upkeep_pipeline::Pipeline;

/// First-generation template: check, decode, encode, submit. No simulation
/// before the state-changing call. Kept while stored jobs migrate.
pub const UPKEEP_PIPELINE_V1: &str = r#"
    encode_check_upkeep      [type=encode_call
                              abi="checkUpkeep(uint256 id, address from)"
                              data="{\"id\":$(jobSpec.upkeepID),\"from\":$(jobSpec.fromAddress)}"]
    check_upkeep             [type=remote_call
                              failEarly=true
                              extractRevertReason=true
                              chainID="$(jobSpec.chainID)"
                              contract="$(jobSpec.contractAddress)"
                              gas="$(jobSpec.checkGasLimit)"
                              gasPrice="$(jobSpec.gasPrice)"
                              gasTipCap="$(jobSpec.gasTipCap)"
                              gasFeeCap="$(jobSpec.gasFeeCap)"
                              data="$(encode_check_upkeep)"]
    decode_check_upkeep      [type=decode_result
                              abi="bytes memory performData, uint256 maxPayment, uint256 gasLimit, uint256 adjustedGasWei, uint256 paymentEth"]
    encode_perform_upkeep    [type=encode_call
                              abi="performUpkeep(uint256 id, bytes calldata performData)"
                              data="{\"id\":$(jobSpec.upkeepID),\"performData\":$(decode_check_upkeep.performData)}"]
    perform_upkeep           [type=submit_transaction
                              minConfirmations=0
                              to="$(jobSpec.contractAddress)"
                              from="[$(jobSpec.fromAddress)]"
                              chainID="$(jobSpec.chainID)"
                              data="$(encode_perform_upkeep)"
                              gasLimit="$(jobSpec.performGasLimit)"
                              txMeta="{\"jobID\":$(jobSpec.jobID),\"upkeepID\":$(jobSpec.prettyID)}"]

    encode_check_upkeep -> check_upkeep -> decode_check_upkeep -> encode_perform_upkeep -> perform_upkeep
"#;

/// Canonical template. Between encoding the perform call and submitting it,
/// the call is simulated read-only and a gate aborts the run unless the
/// simulation reports success.
pub const UPKEEP_PIPELINE: &str = r#"
    encode_check_upkeep      [type=encode_call
                              abi="checkUpkeep(uint256 id, address from)"
                              data="{\"id\":$(jobSpec.upkeepID),\"from\":$(jobSpec.fromAddress)}"]
    check_upkeep             [type=remote_call
                              failEarly=true
                              extractRevertReason=true
                              chainID="$(jobSpec.chainID)"
                              contract="$(jobSpec.contractAddress)"
                              gas="$(jobSpec.checkGasLimit)"
                              gasPrice="$(jobSpec.gasPrice)"
                              gasTipCap="$(jobSpec.gasTipCap)"
                              gasFeeCap="$(jobSpec.gasFeeCap)"
                              data="$(encode_check_upkeep)"]
    decode_check_upkeep      [type=decode_result
                              abi="bytes memory performData, uint256 maxPayment, uint256 gasLimit, uint256 adjustedGasWei, uint256 paymentEth"]
    encode_perform_upkeep    [type=encode_call
                              abi="performUpkeep(uint256 id, bytes calldata performData)"
                              data="{\"id\":$(jobSpec.upkeepID),\"performData\":$(decode_check_upkeep.performData)}"]
    simulate_perform_upkeep  [type=remote_call
                              failEarly=true
                              extractRevertReason=true
                              chainID="$(jobSpec.chainID)"
                              contract="$(jobSpec.contractAddress)"
                              from="$(jobSpec.fromAddress)"
                              gas="$(jobSpec.performGasLimit)"
                              data="$(encode_perform_upkeep)"]
    decode_simulate_result   [type=decode_result
                              abi="bool success"]
    gate_perform_upkeep      [type=conditional_gate
                              failEarly=true
                              data="$(decode_simulate_result.success)"]
    perform_upkeep           [type=submit_transaction
                              minConfirmations=0
                              to="$(jobSpec.contractAddress)"
                              from="[$(jobSpec.fromAddress)]"
                              chainID="$(jobSpec.chainID)"
                              data="$(encode_perform_upkeep)"
                              gasLimit="$(jobSpec.performGasLimit)"
                              txMeta="{\"jobID\":$(jobSpec.jobID),\"upkeepID\":$(jobSpec.prettyID)}"]

    encode_check_upkeep -> check_upkeep -> decode_check_upkeep -> encode_perform_upkeep -> simulate_perform_upkeep -> decode_simulate_result -> gate_perform_upkeep -> perform_upkeep
"#;

// Parsed once per process; the template is identical for every keeper job.
static CANONICAL: Lazy<Arc<Pipeline>> = Lazy::new(|| {
  let pipeline = Pipeline::parse(UPKEEP_PIPELINE)
    .expect("built-in upkeep pipeline template failed to parse");
  debug!(tasks = pipeline.nodes.len(), "parsed canonical upkeep pipeline");
  Arc::new(pipeline)
});

/// The canonical upkeep pipeline. The first call parses the embedded
/// template and panics on failure; an unparseable built-in template is a
/// programming defect, and serving jobs without it is not an option.
pub fn canonical_pipeline() -> Arc<Pipeline> {
  Arc::clone(&CANONICAL)
}
