//! Regression contract for per-chain default sets.
//!
//! Each supported chain's serialized defaults must byte-match the fixture
//! stored under `defaults/<chain id>.csv`. Flip `EXPORT_DEFAULTS` to
//! rewrite the fixtures after an intentional change; never commit it on.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use upkeep_chains::{chain_defaults, supported_chain_ids};

const EXPORT_DEFAULTS: bool = false;

fn fixture_path(chain_id: u64) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("defaults")
    .join(format!("{chain_id}.csv"))
}

#[test]
fn chain_default_sets_match_fixtures() {
  for chain_id in supported_chain_ids() {
    let defaults = chain_defaults(chain_id).unwrap();
    let rendered = defaults.export();
    let path = fixture_path(chain_id);

    if EXPORT_DEFAULTS {
      fs::write(&path, &rendered)
        .unwrap_or_else(|e| panic!("failed writing fixture for chain {chain_id}: {e}"));
      continue;
    }

    let stored = fs::read_to_string(&path)
      .unwrap_or_else(|e| panic!("missing fixture for chain {chain_id}: {e}"));
    assert_eq!(rendered, stored, "defaults drifted for chain {chain_id}");
  }
}

#[test]
fn a_mutated_field_breaks_the_contract() {
  let mut defaults = chain_defaults(1).unwrap().clone();
  defaults.finality_depth += 1;

  let stored = fs::read_to_string(fixture_path(1)).unwrap();
  assert_ne!(defaults.export(), stored);
}

#[test]
fn export_mode_is_off() {
  assert!(!EXPORT_DEFAULTS);
}
