//! Risk management types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Risk management errors
#[derive(Debug, Error)]
pub enum RiskError {
    /// Input outside its valid range; reported before any computation
    #[error("invalid {field}: {value} (expected {expected})")]
    Validation {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Unknown position sizing method
    #[error("invalid position sizing method: {given} (valid methods: fixed_percent, kelly, volatility)")]
    InvalidMethod { given: String },
    /// Entry price equals stop loss price, so per-unit loss is undefined
    #[error("price risk must be greater than zero (entry {entry} equals stop loss {stop_loss})")]
    ZeroPriceRisk { entry: Decimal, stop_loss: Decimal },
    /// Kelly inputs that make the formula meaningless
    #[error("invalid Kelly inputs: {reason}")]
    InvalidKellyInputs { reason: String },
    /// A risk computation failed on otherwise-valid input
    #[error("risk computation failed in {context}: {detail}")]
    Computation {
        context: &'static str,
        detail: String,
    },
}

impl RiskError {
    pub(crate) fn validation(
        field: &'static str,
        value: impl std::fmt::Display,
        expected: &'static str,
    ) -> Self {
        RiskError::Validation {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

/// Coarse risk classification used for correlation and portfolio status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

/// Computed position size for one trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSizeResult {
    /// Symbol the size applies to (may be empty when sizing is generic)
    pub symbol: String,
    /// Quantity of the asset to trade, rounded to 8 dp
    pub quantity: Decimal,
    /// Position value at entry, rounded to 2 dp
    pub notional_value: Decimal,
    /// Dollar amount at risk if stopped out, rounded to 2 dp
    pub risk_amount: Decimal,
    /// Confidence in the sizing method's assumptions
    pub confidence: Decimal,
    /// Whether the size was reduced to honor the max position cap
    pub capped: bool,
}

impl PositionSizeResult {
    /// Attach a symbol to a generic sizing result
    pub fn for_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }
}

/// A position held in the portfolio, supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub current_price: Decimal,
    pub market_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub unrealized_pnl_percent: Decimal,
    /// Portfolio weight in [0, 1]
    pub weight: Decimal,
}

impl PortfolioPosition {
    /// Build a position with derived fields computed from prices
    pub fn from_prices(
        symbol: impl Into<String>,
        quantity: Decimal,
        entry_price: Decimal,
        current_price: Decimal,
        weight: Decimal,
    ) -> Self {
        let market_value = quantity * current_price;
        let unrealized_pnl = (current_price - entry_price) * quantity;
        let unrealized_pnl_percent = if entry_price > Decimal::ZERO {
            (current_price - entry_price) / entry_price
        } else {
            Decimal::ZERO
        };
        Self {
            symbol: symbol.into(),
            quantity,
            entry_price,
            current_price,
            market_value,
            unrealized_pnl,
            unrealized_pnl_percent,
            weight,
        }
    }
}

/// Portfolio-level risk metrics, computed fresh on each assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// 1-day Value at Risk in account currency
    pub var_1d: f64,
    /// Maximum drawdown over the supplied P&L history, in [0, 1]
    pub max_drawdown: f64,
    /// Annualized Sharpe ratio; None without sufficient history
    pub sharpe_ratio: Option<f64>,
    /// Portfolio beta; requires market data the engine does not hold
    pub portfolio_beta: Option<f64>,
    /// Correlation-risk classification
    pub correlation_risk: RiskLevel,
}

/// Pairwise correlation summary across positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub avg_correlation: f64,
    pub max_correlation: f64,
    pub risk_level: RiskLevel,
}

impl CorrelationAnalysis {
    /// Analysis for portfolios with fewer than two positions
    pub fn empty() -> Self {
        Self {
            avg_correlation: 0.0,
            max_correlation: 0.0,
            risk_level: RiskLevel::Low,
        }
    }
}

/// A threshold breach detected against current metrics
#[derive(Debug, Clone, Serialize)]
pub struct RiskAlert {
    pub level: AlertLevel,
    pub message: String,
    /// Name of the metric that breached
    pub metric: &'static str,
    pub current_value: f64,
    pub threshold: f64,
    pub timestamp: DateTime<Utc>,
}

impl RiskAlert {
    pub fn new(
        level: AlertLevel,
        message: impl Into<String>,
        metric: &'static str,
        current_value: f64,
        threshold: f64,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            metric,
            current_value,
            threshold,
            timestamp: Utc::now(),
        }
    }
}
