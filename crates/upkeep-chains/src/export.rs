//! Fixed-order serialization of chain default sets.
//!
//! Row order and per-type formatting are part of the regression contract:
//! the exported text is compared byte-for-byte against the stored fixture
//! for each chain id.

use std::time::Duration;

use crate::defaults::ChainDefaults;

impl ChainDefaults {
  /// Every field as a `(label, formatted value)` row, in the pinned order.
  pub fn rows(&self) -> Vec<(&'static str, String)> {
    vec![
      ("balanceMonitorEnabled", self.balance_monitor_enabled.to_string()),
      ("balanceMonitorBlockDelay", self.balance_monitor_block_delay.to_string()),
      (
        "blockEmissionIdleWarningThreshold",
        format_duration(self.block_emission_idle_warning_threshold),
      ),
      ("blockHistoryEstimatorBatchSize", self.block_history_estimator_batch_size.to_string()),
      ("blockHistoryEstimatorBlockDelay", self.block_history_estimator_block_delay.to_string()),
      (
        "blockHistoryEstimatorBlockHistorySize",
        self.block_history_estimator_block_history_size.to_string(),
      ),
      (
        "blockHistoryEstimatorTransactionPercentile",
        self.block_history_estimator_transaction_percentile.to_string(),
      ),
      (
        "chainType",
        self.chain_type.map(|t| t.as_str()).unwrap_or_default().to_string(),
      ),
      ("eip1559DynamicFees", self.eip1559_dynamic_fees.to_string()),
      ("finalityDepth", self.finality_depth.to_string()),
      ("gasBumpPercent", self.gas_bump_percent.to_string()),
      ("gasBumpThreshold", self.gas_bump_threshold.to_string()),
      ("gasBumpTxDepth", self.gas_bump_tx_depth.to_string()),
      ("gasBumpWei", self.gas_bump_wei.to_string()),
      ("gasEstimatorMode", self.gas_estimator_mode.clone()),
      ("gasFeeCapDefault", self.gas_fee_cap_default.to_string()),
      ("gasLimitDefault", self.gas_limit_default.to_string()),
      ("gasLimitMultiplier", format!("{:.2}", self.gas_limit_multiplier)),
      ("gasLimitTransfer", self.gas_limit_transfer.to_string()),
      ("gasPriceDefault", self.gas_price_default.to_string()),
      ("gasTipCapDefault", self.gas_tip_cap_default.to_string()),
      ("gasTipCapMinimum", self.gas_tip_cap_minimum.to_string()),
      ("headTrackerHistoryDepth", self.head_tracker_history_depth.to_string()),
      ("headTrackerMaxBufferSize", self.head_tracker_max_buffer_size.to_string()),
      (
        "headTrackerSamplingInterval",
        format_duration(self.head_tracker_sampling_interval),
      ),
      ("logBackfillBatchSize", self.log_backfill_batch_size.to_string()),
      ("logPollInterval", format_duration(self.log_poll_interval)),
      ("maxGasPriceWei", self.max_gas_price_wei.to_string()),
      ("maxInFlightTransactions", self.max_in_flight_transactions.to_string()),
      ("maxQueuedTransactions", self.max_queued_transactions.to_string()),
      ("minGasPriceWei", self.min_gas_price_wei.to_string()),
      ("minIncomingConfirmations", self.min_incoming_confirmations.to_string()),
      ("minContractPayment", self.min_contract_payment.to_string()),
      (
        "nodeDeadAfterNoNewHeadersThreshold",
        format_duration(self.node_dead_after_no_new_headers_threshold),
      ),
      ("nodePollFailureThreshold", self.node_poll_failure_threshold.to_string()),
      ("nodePollInterval", format_duration(self.node_poll_interval)),
      ("nonceAutoSync", self.nonce_auto_sync.to_string()),
      ("paymentTokenAddress", self.payment_token_address.clone()),
      ("rpcDefaultBatchSize", self.rpc_default_batch_size.to_string()),
      ("txReaperInterval", format_duration(self.tx_reaper_interval)),
      ("txReaperThreshold", format_duration(self.tx_reaper_threshold)),
      ("txResendAfterThreshold", format_duration(self.tx_resend_after_threshold)),
      ("useForwarders", self.use_forwarders.to_string()),
    ]
  }

  /// The rows as `label,value` lines, the fixture file format.
  pub fn export(&self) -> String {
    let mut out = String::new();
    for (label, value) in self.rows() {
      out.push_str(label);
      out.push(',');
      out.push_str(&value);
      out.push('\n');
    }
    out
  }
}

/// Canonical compact duration form: nonzero `h`/`m`/`s`/`ms`/`us` units in
/// descending order, `0s` for zero. `90s` renders as `1m30s`.
pub fn format_duration(duration: Duration) -> String {
  if duration.is_zero() {
    return "0s".to_string();
  }

  const UNITS: [(&str, u128); 5] = [
    ("h", 3_600_000_000),
    ("m", 60_000_000),
    ("s", 1_000_000),
    ("ms", 1_000),
    ("us", 1),
  ];

  let mut out = String::new();
  let mut rest = duration.as_micros();
  for (label, size) in UNITS {
    let count = rest / size;
    if count > 0 {
      out.push_str(&count.to_string());
      out.push_str(label);
      rest %= size;
    }
  }
  out
}

/// Parse the format produced by [`format_duration`].
pub fn parse_duration(text: &str) -> Option<Duration> {
  if text.is_empty() {
    return None;
  }

  let mut total = Duration::ZERO;
  let mut rest = text;
  while !rest.is_empty() {
    let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
      return None;
    }
    let (digits, tail) = rest.split_at(digits_end);
    let value: u64 = digits.parse().ok()?;

    let unit_end = tail
      .find(|c: char| c.is_ascii_digit())
      .unwrap_or(tail.len());
    let (unit, next) = tail.split_at(unit_end);
    total += match unit {
      "h" => Duration::from_secs(value.checked_mul(3_600)?),
      "m" => Duration::from_secs(value.checked_mul(60)?),
      "s" => Duration::from_secs(value),
      "ms" => Duration::from_millis(value),
      "us" => Duration::from_micros(value),
      _ => return None,
    };
    rest = next;
  }
  Some(total)
}
