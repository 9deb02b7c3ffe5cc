//! Portfolio risk assessment
//!
//! VaR, drawdown, Sharpe ratio, and correlation risk over a set of
//! caller-supplied positions. The statistical work runs in f64; money
//! enters and leaves as `Decimal`.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::alerts::generate_alerts;
use super::stats;
use super::types::{CorrelationAnalysis, PortfolioPosition, RiskAlert, RiskError, RiskLevel, RiskMetrics};
use crate::config::RiskParameters;

/// Assumed annualized volatility per crypto asset
const CRYPTO_VOLATILITY_ASSUMPTION: f64 = 0.75;
/// Assumed pairwise correlation between crypto assets
const ASSET_CORRELATION_ASSUMPTION: f64 = 0.6;
/// Default VaR confidence level (0.05 = 95% VaR)
const DEFAULT_VAR_CONFIDENCE_LEVEL: f64 = 0.05;
/// Annual risk-free rate used by the Sharpe ratio
const RISK_FREE_RATE: f64 = 0.02;

/// Estimates pairwise correlation between two symbols
///
/// The default heuristic below is symbol-substring based; this seam exists
/// so a historical estimator can replace it without touching the
/// assessor's control flow.
pub trait CorrelationEstimator: Send + Sync {
    fn estimate(&self, symbol_a: &str, symbol_b: &str) -> f64;
}

/// Substring heuristic: BTC pairs are near-lockstep, majors track each
/// other closely, distinct alts less so
#[derive(Debug, Clone, Default)]
pub struct SymbolHeuristicCorrelation;

impl CorrelationEstimator for SymbolHeuristicCorrelation {
    fn estimate(&self, symbol_a: &str, symbol_b: &str) -> f64 {
        let is_major = |s: &str| s.contains("BTC") || s.contains("ETH");
        if symbol_a.contains("BTC") && symbol_b.contains("BTC") {
            0.95
        } else if is_major(symbol_a) && is_major(symbol_b) {
            0.85
        } else if symbol_a.ends_with("USDT") && symbol_b.ends_with("USDT") {
            0.70
        } else {
            0.60
        }
    }
}

/// Full assessment bundle returned to the orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioAssessment {
    pub metrics: RiskMetrics,
    pub correlation: CorrelationAnalysis,
    pub alerts: Vec<RiskAlert>,
    pub concentration_risk: RiskLevel,
    pub max_position_weight: f64,
    pub total_positions: usize,
    pub recommendations: Vec<String>,
}

/// Portfolio risk calculator
pub struct PortfolioAssessor {
    params: RiskParameters,
    correlation: Box<dyn CorrelationEstimator>,
}

impl PortfolioAssessor {
    pub fn new(params: RiskParameters) -> Self {
        Self {
            params,
            correlation: Box::new(SymbolHeuristicCorrelation),
        }
    }

    /// Substitute a different correlation estimator
    pub fn with_correlation_estimator(mut self, estimator: Box<dyn CorrelationEstimator>) -> Self {
        self.correlation = estimator;
        self
    }

    /// 1-day portfolio Value at Risk
    ///
    /// Weights positions by market value, applies fixed per-asset
    /// volatility and pairwise correlation assumptions, scales to the
    /// horizon, and multiplies by the normal quantile for the
    /// confidence level. Returns 0 for an empty or worthless book.
    pub fn portfolio_var(
        &self,
        positions: &[PortfolioPosition],
        confidence_level: f64,
        time_horizon_days: u32,
    ) -> Result<f64, RiskError> {
        if positions.is_empty() {
            return Ok(0.0);
        }

        let values: Vec<f64> = positions.iter().map(|p| to_f64(p.market_value)).collect();
        let total_value: f64 = values.iter().sum();
        if total_value <= 0.0 {
            return Ok(0.0);
        }

        if !(0.0..1.0).contains(&confidence_level) || confidence_level == 0.0 {
            return Err(RiskError::validation(
                "confidence_level",
                confidence_level,
                "strictly between 0 and 1",
            ));
        }

        let weights: Vec<f64> = values.iter().map(|v| v / total_value).collect();
        let n = weights.len();

        // w' * (outer(vol, vol) ⊙ corr) * w with uniform volatility
        let mut portfolio_variance = 0.0;
        for i in 0..n {
            for j in 0..n {
                let corr = if i == j { 1.0 } else { ASSET_CORRELATION_ASSUMPTION };
                portfolio_variance += weights[i]
                    * weights[j]
                    * CRYPTO_VOLATILITY_ASSUMPTION
                    * CRYPTO_VOLATILITY_ASSUMPTION
                    * corr;
            }
        }

        let portfolio_volatility = portfolio_variance.sqrt();
        let horizon_volatility = portfolio_volatility * (time_horizon_days as f64 / 365.0).sqrt();
        let var_multiplier = stats::normal_ppf(1.0 - confidence_level);

        Ok(total_value * horizon_volatility * var_multiplier)
    }

    /// Maximum drawdown over a P&L history, in [0, 1]
    ///
    /// Computed over cumulative P&L against its running maximum.
    /// Requires at least two history points.
    pub fn max_drawdown(&self, pnl_history: &[f64]) -> f64 {
        if pnl_history.len() < 2 {
            return 0.0;
        }

        let mut cumulative = 0.0;
        let mut running_max = f64::NEG_INFINITY;
        let mut worst = 0.0_f64;

        for pnl in pnl_history {
            cumulative += pnl;
            running_max = running_max.max(cumulative);
            let drawdown = (cumulative - running_max) / running_max.max(1.0);
            worst = worst.min(drawdown);
        }

        // Histories that go deeply negative can push the ratio past 1;
        // drawdown is reported as a fraction of peak, so cap it there.
        worst.abs().min(1.0)
    }

    /// Annualized Sharpe ratio; 0 for fewer than two returns or zero
    /// variance
    pub fn sharpe_ratio(&self, returns: &[f64]) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }

        let mean_return = stats::mean(returns);
        let std_return = stats::std_dev(returns);
        if std_return == 0.0 {
            return 0.0;
        }

        (mean_return - RISK_FREE_RATE / 365.0) / std_return * 365.0_f64.sqrt()
    }

    /// Pairwise correlation risk across positions
    pub fn assess_correlation(&self, positions: &[PortfolioPosition]) -> CorrelationAnalysis {
        if positions.len() < 2 {
            return CorrelationAnalysis::empty();
        }

        let mut correlations = Vec::new();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                correlations.push(
                    self.correlation
                        .estimate(&positions[i].symbol, &positions[j].symbol),
                );
            }
        }

        let max_correlation = correlations.iter().cloned().fold(0.0, f64::max);
        let risk_level = if max_correlation > 0.8 {
            RiskLevel::High
        } else if max_correlation > 0.6 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        CorrelationAnalysis {
            avg_correlation: stats::mean(&correlations),
            max_correlation,
            risk_level,
        }
    }

    /// Assess the whole portfolio: metrics, correlation detail, alerts,
    /// concentration, and recommendations
    ///
    /// Positions with non-positive market value are skipped with a log
    /// rather than aborting the assessment.
    pub fn assess(
        &self,
        positions: &[PortfolioPosition],
        account_balance: Decimal,
        pnl_history: Option<&[f64]>,
    ) -> Result<PortfolioAssessment, RiskError> {
        let usable: Vec<PortfolioPosition> = positions
            .iter()
            .filter(|p| {
                if p.market_value <= Decimal::ZERO {
                    warn!(symbol = %p.symbol, market_value = %p.market_value, "skipping malformed position");
                    false
                } else {
                    true
                }
            })
            .cloned()
            .collect();

        debug!(positions = usable.len(), "assessing portfolio risk");

        let var_1d = self.portfolio_var(&usable, DEFAULT_VAR_CONFIDENCE_LEVEL, 1)?;
        let correlation = self.assess_correlation(&usable);

        let (max_drawdown, sharpe_ratio) = match pnl_history {
            Some(history) if history.len() > 1 => (
                self.max_drawdown(history),
                Some(self.sharpe_ratio(history)),
            ),
            _ => (0.0, None),
        };

        let metrics = RiskMetrics {
            var_1d,
            max_drawdown,
            sharpe_ratio,
            portfolio_beta: None,
            correlation_risk: correlation.risk_level,
        };

        let reference_balance = to_f64(account_balance);
        let alerts = generate_alerts(&metrics, &self.params, reference_balance);
        crate::telemetry::record_alerts(alerts.len());

        let weights: Vec<f64> = usable
            .iter()
            .map(|p| to_f64(p.weight))
            .filter(|w| *w > 0.0)
            .collect();
        let max_position_weight = weights.iter().cloned().fold(0.0, f64::max);
        let concentration_risk = if max_position_weight > 0.3 {
            RiskLevel::High
        } else if max_position_weight > 0.2 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let mut recommendations = Vec::new();
        if correlation.risk_level == RiskLevel::High {
            recommendations.push("Diversify positions to reduce correlation risk".to_string());
        }
        if reference_balance > 0.0 && var_1d > reference_balance * 0.05 {
            recommendations.push("Reduce position sizes to lower VaR".to_string());
        }
        if max_drawdown > 0.10 {
            recommendations.push("Review stop-loss levels".to_string());
        }

        Ok(PortfolioAssessment {
            metrics,
            correlation,
            alerts,
            concentration_risk,
            max_position_weight,
            total_positions: usable.len(),
            recommendations,
        })
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.try_into().unwrap_or(0.0)
}
