use std::collections::BTreeMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

/// Chains whose execution layer diverges enough from the default to need
/// special handling downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainType {
  Arbitrum,
  Optimism,
  XDai,
}

impl ChainType {
  pub fn as_str(&self) -> &'static str {
    match self {
      ChainType::Arbitrum => "arbitrum",
      ChainType::Optimism => "optimism",
      ChainType::XDai => "xdai",
    }
  }
}

/// Default operational parameters for one chain.
///
/// This is a regression contract, not live configuration: the serialized
/// form of every set is pinned by a fixture file, and any change here must
/// change the fixture with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainDefaults {
  pub balance_monitor_enabled: bool,
  pub balance_monitor_block_delay: u16,
  pub block_emission_idle_warning_threshold: Duration,
  pub block_history_estimator_batch_size: u32,
  pub block_history_estimator_block_delay: u16,
  pub block_history_estimator_block_history_size: u16,
  pub block_history_estimator_transaction_percentile: u16,
  pub chain_type: Option<ChainType>,
  pub eip1559_dynamic_fees: bool,
  pub finality_depth: u32,
  pub gas_bump_percent: u16,
  pub gas_bump_threshold: u64,
  pub gas_bump_tx_depth: u16,
  pub gas_bump_wei: Decimal,
  pub gas_estimator_mode: String,
  pub gas_fee_cap_default: Decimal,
  pub gas_limit_default: u64,
  pub gas_limit_multiplier: f32,
  pub gas_limit_transfer: u64,
  pub gas_price_default: Decimal,
  pub gas_tip_cap_default: Decimal,
  pub gas_tip_cap_minimum: Decimal,
  pub head_tracker_history_depth: u32,
  pub head_tracker_max_buffer_size: u32,
  pub head_tracker_sampling_interval: Duration,
  pub log_backfill_batch_size: u32,
  pub log_poll_interval: Duration,
  pub max_gas_price_wei: Decimal,
  pub max_in_flight_transactions: u32,
  pub max_queued_transactions: u64,
  pub min_gas_price_wei: Decimal,
  pub min_incoming_confirmations: u32,
  pub min_contract_payment: Decimal,
  pub node_dead_after_no_new_headers_threshold: Duration,
  pub node_poll_failure_threshold: u32,
  pub node_poll_interval: Duration,
  pub nonce_auto_sync: bool,
  pub payment_token_address: String,
  pub rpc_default_batch_size: u32,
  pub tx_reaper_interval: Duration,
  pub tx_reaper_threshold: Duration,
  pub tx_resend_after_threshold: Duration,
  pub use_forwarders: bool,
}

fn wei(amount: i64) -> Decimal {
  Decimal::new(amount, 0)
}

/// Baseline set every chain starts from.
pub fn fallback_defaults() -> ChainDefaults {
  ChainDefaults {
    balance_monitor_enabled: true,
    balance_monitor_block_delay: 1,
    block_emission_idle_warning_threshold: Duration::from_secs(90),
    block_history_estimator_batch_size: 4,
    block_history_estimator_block_delay: 1,
    block_history_estimator_block_history_size: 8,
    block_history_estimator_transaction_percentile: 60,
    chain_type: None,
    eip1559_dynamic_fees: false,
    finality_depth: 50,
    gas_bump_percent: 20,
    gas_bump_threshold: 3,
    gas_bump_tx_depth: 10,
    gas_bump_wei: wei(5_000_000_000),
    gas_estimator_mode: "BlockHistory".to_string(),
    gas_fee_cap_default: wei(100_000_000_000),
    gas_limit_default: 500_000,
    gas_limit_multiplier: 1.0,
    gas_limit_transfer: 21_000,
    gas_price_default: wei(20_000_000_000),
    gas_tip_cap_default: wei(1_000_000_000),
    gas_tip_cap_minimum: wei(1),
    head_tracker_history_depth: 100,
    head_tracker_max_buffer_size: 3,
    head_tracker_sampling_interval: Duration::from_secs(1),
    log_backfill_batch_size: 100,
    log_poll_interval: Duration::from_secs(15),
    max_gas_price_wei: wei(5_000_000_000_000),
    max_in_flight_transactions: 16,
    max_queued_transactions: 250,
    min_gas_price_wei: wei(1_000_000_000),
    min_incoming_confirmations: 3,
    min_contract_payment: Decimal::new(1, 5),
    node_dead_after_no_new_headers_threshold: Duration::from_secs(180),
    node_poll_failure_threshold: 5,
    node_poll_interval: Duration::from_secs(10),
    nonce_auto_sync: true,
    payment_token_address: String::new(),
    rpc_default_batch_size: 100,
    tx_reaper_interval: Duration::from_secs(3_600),
    tx_reaper_threshold: Duration::from_secs(604_800),
    tx_resend_after_threshold: Duration::from_secs(60),
    use_forwarders: false,
  }
}

fn mainnet() -> ChainDefaults {
  ChainDefaults {
    min_contract_payment: Decimal::new(1, 1),
    payment_token_address: "0x514910771AF9Ca656af840dff83E8264EcF986CA".to_string(),
    ..fallback_defaults()
  }
}

fn optimism() -> ChainDefaults {
  ChainDefaults {
    chain_type: Some(ChainType::Optimism),
    finality_depth: 1,
    gas_bump_threshold: 0, // the sequencer does not reorder by price
    gas_estimator_mode: "FixedPrice".to_string(),
    gas_price_default: wei(1_000_000),
    head_tracker_history_depth: 10,
    min_gas_price_wei: wei(0),
    min_incoming_confirmations: 1,
    node_dead_after_no_new_headers_threshold: Duration::ZERO,
    payment_token_address: "0x350a791Bfc2C21F9Ed5d10980Dad2e2638ffa7f6".to_string(),
    tx_resend_after_threshold: Duration::from_secs(15),
    ..fallback_defaults()
  }
}

fn bsc() -> ChainDefaults {
  ChainDefaults {
    block_emission_idle_warning_threshold: Duration::from_secs(15),
    gas_price_default: wei(5_000_000_000),
    log_poll_interval: Duration::from_secs(3),
    node_dead_after_no_new_headers_threshold: Duration::from_secs(30),
    payment_token_address: "0x404460C6A5EdE2D891e8297795264fDe62ADBB75".to_string(),
    ..fallback_defaults()
  }
}

fn polygon() -> ChainDefaults {
  ChainDefaults {
    finality_depth: 500, // frequent deep reorgs
    gas_bump_wei: wei(20_000_000_000),
    gas_price_default: wei(30_000_000_000),
    log_poll_interval: Duration::from_secs(1),
    max_queued_transactions: 5_000,
    min_gas_price_wei: wei(30_000_000_000),
    min_incoming_confirmations: 5,
    payment_token_address: "0xb0897686c545045aFc77CF20eC7A532E3120E0F1".to_string(),
    tx_resend_after_threshold: Duration::from_secs(300),
    ..fallback_defaults()
  }
}

fn arbitrum() -> ChainDefaults {
  ChainDefaults {
    chain_type: Some(ChainType::Arbitrum),
    gas_bump_threshold: 0,
    gas_estimator_mode: "FixedPrice".to_string(),
    gas_limit_default: 7_000_000,
    gas_limit_transfer: 800_000,
    gas_price_default: wei(100_000_000),
    max_gas_price_wei: wei(1_000_000_000_000),
    min_gas_price_wei: wei(0),
    payment_token_address: "0xf97f4df75117a78c1A5a0DBb814Af92458539FB4".to_string(),
    ..fallback_defaults()
  }
}

static DEFAULT_SETS: Lazy<BTreeMap<u64, ChainDefaults>> = Lazy::new(|| {
  BTreeMap::from([
    (1, mainnet()),
    (10, optimism()),
    (56, bsc()),
    (137, polygon()),
    (42_161, arbitrum()),
  ])
});

/// Default set for a chain, if supported.
pub fn chain_defaults(chain_id: u64) -> Option<&'static ChainDefaults> {
  DEFAULT_SETS.get(&chain_id)
}

/// Supported chain ids, ascending.
pub fn supported_chain_ids() -> Vec<u64> {
  DEFAULT_SETS.keys().copied().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn registry_covers_the_expected_chains() {
    assert_eq!(supported_chain_ids(), vec![1, 10, 56, 137, 42_161]);
  }

  #[test]
  fn mainnet_keeps_the_fallback_shape() {
    let mainnet = chain_defaults(1).unwrap();
    let fallback = fallback_defaults();
    assert_eq!(mainnet.finality_depth, fallback.finality_depth);
    assert_eq!(mainnet.gas_estimator_mode, fallback.gas_estimator_mode);
    assert_eq!(mainnet.min_contract_payment.to_string(), "0.1");
  }

  #[test]
  fn rollups_disable_gas_bumping() {
    assert_eq!(chain_defaults(10).unwrap().gas_bump_threshold, 0);
    assert_eq!(chain_defaults(42_161).unwrap().gas_bump_threshold, 0);
  }

  #[test]
  fn unsupported_chain_has_no_defaults() {
    assert!(chain_defaults(99_999).is_none());
  }
}
