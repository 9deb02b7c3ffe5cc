//! Kelly criterion optimization
//!
//! Standalone Kelly calculator with expected value, a capped optimal
//! fraction, and a risk-of-ruin estimate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::sizing::MAX_KELLY_FRACTION;
use super::types::{RiskError, RiskLevel};

/// Position-size adjustment suggested by the Kelly outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeRecommendation {
    IncreaseSize,
    DecreaseSize,
    Maintain,
}

/// Result of a Kelly criterion optimization
#[derive(Debug, Clone, Serialize)]
pub struct KellyOutcome {
    /// Unclamped Kelly fraction from the raw formula
    pub raw_fraction: Decimal,
    /// Fraction clamped to [0, max_kelly]
    pub optimal_fraction: Decimal,
    /// Win/loss odds ratio b = avg_win / avg_loss
    pub odds_ratio: Decimal,
    /// Expected value per trade
    pub expected_value: Decimal,
    /// Probability of ruin under the raw fraction, clamped to [0, 1]
    pub risk_of_ruin: f64,
    pub recommendation: SizeRecommendation,
    pub risk_level: RiskLevel,
}

/// Kelly criterion calculator with a hard fraction cap
#[derive(Debug, Clone)]
pub struct KellyOptimizer {
    /// Maximum fraction to recommend regardless of the raw formula
    pub max_kelly: Decimal,
}

impl KellyOptimizer {
    pub fn new(max_kelly: Decimal) -> Self {
        Self { max_kelly }
    }

    /// Compute the optimal Kelly fraction
    ///
    /// Kelly formula: f = (b*p - q) / b where b = avg_win/avg_loss,
    /// p = win_rate, q = 1 - p. Fails validation for win rates outside
    /// (0, 1) or non-positive win/loss amounts; no partial result.
    pub fn optimize(
        &self,
        win_rate: Decimal,
        avg_win: Decimal,
        avg_loss: Decimal,
    ) -> Result<KellyOutcome, RiskError> {
        if win_rate <= Decimal::ZERO || win_rate >= Decimal::ONE {
            return Err(RiskError::InvalidKellyInputs {
                reason: format!("win rate must be between 0 and 1, got {win_rate}"),
            });
        }
        if avg_win <= Decimal::ZERO || avg_loss <= Decimal::ZERO {
            return Err(RiskError::InvalidKellyInputs {
                reason: format!(
                    "average win and loss amounts must be positive, got win {avg_win}, loss {avg_loss}"
                ),
            });
        }

        let b = avg_win / avg_loss;
        let p = win_rate;
        let q = Decimal::ONE - win_rate;

        let raw_fraction = (b * p - q) / b;
        let optimal_fraction = raw_fraction.max(Decimal::ZERO).min(self.max_kelly);
        let expected_value = p * avg_win - q * avg_loss;

        // Approximate risk of ruin for Kelly betting: ((1-p)/p)^(1/f)
        let raw_f: f64 = raw_fraction.try_into().unwrap_or(0.0);
        let risk_of_ruin = if raw_f > 0.0 && raw_f < 1.0 {
            let p_f: f64 = p.try_into().unwrap_or(0.5);
            let ratio = (1.0 - p_f) / p_f;
            ratio.powf(1.0 / raw_f).min(1.0)
        } else {
            1.0
        };

        let recommendation = if optimal_fraction > dec!(0.05) {
            SizeRecommendation::IncreaseSize
        } else if optimal_fraction < dec!(0.02) {
            SizeRecommendation::DecreaseSize
        } else {
            SizeRecommendation::Maintain
        };

        let risk_level = if optimal_fraction > dec!(0.15) {
            RiskLevel::High
        } else if optimal_fraction > dec!(0.05) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        Ok(KellyOutcome {
            raw_fraction,
            optimal_fraction,
            odds_ratio: b,
            expected_value,
            risk_of_ruin,
            recommendation,
            risk_level,
        })
    }
}

impl Default for KellyOptimizer {
    fn default() -> Self {
        Self::new(MAX_KELLY_FRACTION)
    }
}
