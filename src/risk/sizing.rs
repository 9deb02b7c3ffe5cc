//! Position sizing implementations
//!
//! Converts account balance, risk tolerance, and price levels into a
//! bounded trade quantity under three interchangeable methods. All
//! methods share the same post-processing: the notional value is capped
//! at `balance * max_position_size` and a capped result carries reduced
//! confidence.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use tracing::warn;

use super::types::{PositionSizeResult, RiskError};
use crate::config::RiskParameters;

/// Assumed win rate for the simplified Kelly method
const DEFAULT_WIN_RATE: Decimal = dec!(0.60);
/// Hard cap on the Kelly fraction, bounding risk of ruin
pub const MAX_KELLY_FRACTION: Decimal = dec!(0.25);
/// Fixed volatility adjustment applied by the volatility method
const VOLATILITY_FACTOR: Decimal = dec!(0.8);

/// Position sizing method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    /// Fixed percentage of balance at risk per trade
    #[default]
    FixedPercent,
    /// Simplified Kelly with assumed win rate and 1:2 risk/reward
    Kelly,
    /// Risk amount scaled by a volatility adjustment factor
    Volatility,
}

impl SizingMethod {
    /// Confidence assigned before any cap is applied
    fn base_confidence(&self) -> Decimal {
        match self {
            SizingMethod::FixedPercent => dec!(0.8),
            SizingMethod::Kelly => dec!(0.9),
            SizingMethod::Volatility => dec!(0.7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizingMethod::FixedPercent => "fixed_percent",
            SizingMethod::Kelly => "kelly",
            SizingMethod::Volatility => "volatility",
        }
    }
}

impl FromStr for SizingMethod {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed_percent" => Ok(SizingMethod::FixedPercent),
            "kelly" => Ok(SizingMethod::Kelly),
            "volatility" => Ok(SizingMethod::Volatility),
            other => Err(RiskError::InvalidMethod {
                given: other.to_string(),
            }),
        }
    }
}

/// Derived sizing metrics for the orchestrator's audit trail
#[derive(Debug, Clone, serde::Serialize)]
pub struct SizeAudit {
    pub risk_per_trade_percent: Decimal,
    pub position_value_percent: Decimal,
    pub price_risk: Decimal,
    pub max_loss: Decimal,
}

/// Position size calculator
#[derive(Debug, Clone)]
pub struct PositionSizer {
    /// Maximum position as fraction of account balance
    max_position_size: Decimal,
}

impl PositionSizer {
    pub fn new(max_position_size: Decimal) -> Self {
        Self { max_position_size }
    }

    pub fn from_params(params: &RiskParameters) -> Self {
        Self::new(params.max_position_size)
    }

    /// Compute the position size for one trade
    ///
    /// `risk_per_trade` is a fraction of `account_balance` (e.g. 0.02
    /// for 2%). Fails with a validation error on out-of-range inputs
    /// and with a domain error when entry equals stop loss.
    pub fn compute(
        &self,
        account_balance: Decimal,
        risk_per_trade: Decimal,
        entry_price: Decimal,
        stop_loss_price: Decimal,
        method: SizingMethod,
    ) -> Result<PositionSizeResult, RiskError> {
        validate_range(
            "account_balance",
            account_balance,
            dec!(0.01),
            None,
            "at least 0.01",
        )?;
        validate_range(
            "risk_per_trade",
            risk_per_trade,
            dec!(0.001),
            Some(dec!(0.5)),
            "between 0.001 and 0.5",
        )?;
        validate_range("entry_price", entry_price, dec!(0.01), None, "at least 0.01")?;
        validate_range(
            "stop_loss_price",
            stop_loss_price,
            dec!(0.01),
            None,
            "at least 0.01",
        )?;

        let risk_amount = account_balance * risk_per_trade;
        let price_risk = (entry_price - stop_loss_price).abs();

        if price_risk <= Decimal::ZERO {
            return Err(RiskError::ZeroPriceRisk {
                entry: entry_price,
                stop_loss: stop_loss_price,
            });
        }

        let (mut quantity, mut confidence) = match method {
            SizingMethod::FixedPercent => (risk_amount / price_risk, method.base_confidence()),
            SizingMethod::Kelly => {
                // Assumes 1:2 risk/reward around the stop distance
                let avg_win = price_risk * dec!(2);
                let avg_loss = price_risk;
                if avg_win <= Decimal::ZERO {
                    return Err(RiskError::InvalidKellyInputs {
                        reason: format!("average win must be positive, got {avg_win}"),
                    });
                }
                let kelly_fraction = (DEFAULT_WIN_RATE * avg_win
                    - (Decimal::ONE - DEFAULT_WIN_RATE) * avg_loss)
                    / avg_win;
                let kelly_fraction = kelly_fraction.max(Decimal::ZERO).min(MAX_KELLY_FRACTION);
                let kelly_risk_amount = account_balance * kelly_fraction;
                (kelly_risk_amount / price_risk, method.base_confidence())
            }
            SizingMethod::Volatility => {
                let adjusted_risk = risk_amount / VOLATILITY_FACTOR;
                (adjusted_risk / price_risk, method.base_confidence())
            }
        };

        let mut notional_value = quantity * entry_price;
        let max_position_value = account_balance * self.max_position_size;
        let mut capped = false;

        if notional_value > max_position_value {
            warn!(
                notional = %notional_value.round_dp(2),
                cap = %max_position_value.round_dp(2),
                method = method.as_str(),
                "position size capped"
            );
            quantity = max_position_value / entry_price;
            notional_value = max_position_value;
            confidence *= dec!(0.8);
            capped = true;
            crate::telemetry::record_size_capped();
        }

        Ok(PositionSizeResult {
            symbol: String::new(),
            quantity: quantity.round_dp(8),
            notional_value: notional_value.round_dp(2),
            risk_amount: risk_amount.round_dp(2),
            confidence,
            capped,
        })
    }

    /// Derived metrics reported alongside a sizing result
    pub fn audit(
        &self,
        result: &PositionSizeResult,
        account_balance: Decimal,
        risk_per_trade: Decimal,
        entry_price: Decimal,
        stop_loss_price: Decimal,
    ) -> SizeAudit {
        SizeAudit {
            risk_per_trade_percent: risk_per_trade * dec!(100),
            position_value_percent: if account_balance > Decimal::ZERO {
                (result.notional_value / account_balance) * dec!(100)
            } else {
                Decimal::ZERO
            },
            price_risk: (entry_price - stop_loss_price).abs(),
            max_loss: result.risk_amount,
        }
    }
}

fn validate_range(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Option<Decimal>,
    expected: &'static str,
) -> Result<(), RiskError> {
    if value < min {
        return Err(RiskError::validation(field, value, expected));
    }
    if let Some(max) = max {
        if value > max {
            return Err(RiskError::validation(field, value, expected));
        }
    }
    Ok(())
}
