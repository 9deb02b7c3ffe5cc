//! Engine metrics
//!
//! Counters for decision outcomes, alert volume, and capped sizing
//! results. Recorded through the `metrics` facade; the orchestrator
//! decides which exporter to install.

use metrics::counter;

/// Record a completed decision cycle
pub fn record_decision(outcome: &'static str) {
    counter!("sentinel_decisions_total", "outcome" => outcome).increment(1);
}

/// Record risk alerts generated by an assessment
pub fn record_alerts(count: usize) {
    counter!("sentinel_risk_alerts_total").increment(count as u64);
}

/// Record a position size that hit the max position cap
pub fn record_size_capped() {
    counter!("sentinel_position_size_capped_total").increment(1);
}
