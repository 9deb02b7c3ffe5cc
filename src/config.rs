//! Configuration types for crypto-sentinel

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::risk::SizingMethod;
use crate::signal::RiskTolerance;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub risk: RiskParameters,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Risk management parameters
///
/// Treated as read-only for the lifetime of a risk assessment call.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskParameters {
    /// Maximum position as fraction of account balance
    #[serde(default = "default_max_position_size")]
    pub max_position_size: Decimal,

    /// Maximum portfolio risk per trade (fraction of balance)
    #[serde(default = "default_max_portfolio_risk")]
    pub max_portfolio_risk: Decimal,

    /// Maximum drawdown before critical alerts fire
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: Decimal,

    /// Maximum acceptable correlation between positions
    #[serde(default = "default_max_correlation")]
    pub max_correlation: Decimal,

    /// Stop loss distance as fraction of entry price
    #[serde(default = "default_stop_loss_percent")]
    pub stop_loss_percent: Decimal,

    /// Take profit as multiple of risk (1:N risk/reward)
    #[serde(default = "default_take_profit_ratio")]
    pub take_profit_ratio: Decimal,
}

fn default_max_position_size() -> Decimal {
    Decimal::new(20, 2) // 0.20 = 20% per position
}
fn default_max_portfolio_risk() -> Decimal {
    Decimal::new(2, 2) // 0.02 = 2%
}
fn default_max_drawdown() -> Decimal {
    Decimal::new(15, 2) // 0.15 = 15%
}
fn default_max_correlation() -> Decimal {
    Decimal::new(7, 1) // 0.7
}
fn default_stop_loss_percent() -> Decimal {
    Decimal::new(5, 2) // 0.05 = 5%
}
fn default_take_profit_ratio() -> Decimal {
    Decimal::new(2, 0) // 1:2 risk/reward
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            max_position_size: default_max_position_size(),
            max_portfolio_risk: default_max_portfolio_risk(),
            max_drawdown: default_max_drawdown(),
            max_correlation: default_max_correlation(),
            stop_loss_percent: default_stop_loss_percent(),
            take_profit_ratio: default_take_profit_ratio(),
        }
    }
}

/// Trading decision configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Risk per trade as fraction of account balance
    #[serde(default = "default_risk_per_trade")]
    pub risk_per_trade: Decimal,

    /// Minimum confidence required to act on a signal
    #[serde(default = "default_min_confidence")]
    pub min_confidence: Decimal,

    /// Risk tolerance passed to the AI collaborator
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,

    /// Position sizing method
    #[serde(default)]
    pub sizing_method: SizingMethod,

    /// Weight of the technical signal in the rule-based fallback
    #[serde(default = "default_technical_weight")]
    pub technical_weight: Decimal,

    /// Weight of news sentiment in the rule-based fallback
    #[serde(default = "default_news_weight")]
    pub news_weight: Decimal,

    /// Weight of social sentiment in the rule-based fallback
    #[serde(default = "default_social_weight")]
    pub social_weight: Decimal,
}

fn default_risk_per_trade() -> Decimal {
    Decimal::new(2, 2) // 0.02 = 2%
}
fn default_min_confidence() -> Decimal {
    Decimal::new(7, 1) // 0.7
}
fn default_technical_weight() -> Decimal {
    Decimal::new(6, 1) // 0.6
}
fn default_news_weight() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
fn default_social_weight() -> Decimal {
    Decimal::new(4, 1) // 0.4
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            risk_per_trade: default_risk_per_trade(),
            min_confidence: default_min_confidence(),
            risk_tolerance: RiskTolerance::default(),
            sizing_method: SizingMethod::default(),
            technical_weight: default_technical_weight(),
            news_weight: default_news_weight(),
            social_weight: default_social_weight(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A fraction-valued option is outside its plausible range
    #[error("{field} must be within {min}..={max}, got {value}")]
    ImplausibleFraction {
        field: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
    /// Configuration file could not be read or parsed
    #[error("failed to load configuration: {0}")]
    Load(#[from] anyhow::Error),
}

fn check_fraction(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::ImplausibleFraction {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl RiskParameters {
    /// Validate that all options are plausible fractions before handing
    /// them to the risk engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        let one = Decimal::ONE;
        let zero = Decimal::ZERO;
        check_fraction("max_position_size", self.max_position_size, Decimal::new(1, 2), one)?;
        check_fraction("max_portfolio_risk", self.max_portfolio_risk, Decimal::new(1, 3), Decimal::new(5, 1))?;
        check_fraction("max_drawdown", self.max_drawdown, Decimal::new(1, 2), one)?;
        check_fraction("max_correlation", self.max_correlation, zero, one)?;
        check_fraction("stop_loss_percent", self.stop_loss_percent, Decimal::new(1, 3), Decimal::new(5, 1))?;
        if self.take_profit_ratio <= zero {
            return Err(ConfigError::ImplausibleFraction {
                field: "take_profit_ratio",
                value: self.take_profit_ratio,
                min: Decimal::new(1, 1),
                max: Decimal::new(10, 0),
            });
        }
        Ok(())
    }
}

impl TradingConfig {
    /// Validate trading options
    pub fn validate(&self) -> Result<(), ConfigError> {
        let one = Decimal::ONE;
        check_fraction("risk_per_trade", self.risk_per_trade, Decimal::new(1, 3), Decimal::new(5, 1))?;
        check_fraction("min_confidence", self.min_confidence, Decimal::ZERO, one)?;
        check_fraction("technical_weight", self.technical_weight, Decimal::ZERO, one)?;
        check_fraction("news_weight", self.news_weight, Decimal::ZERO, one)?;
        check_fraction("social_weight", self.social_weight, Decimal::ZERO, one)?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(anyhow::Error::from)?;
        let config: Config = toml::from_str(&content).map_err(anyhow::Error::from)?;
        config.risk.validate()?;
        config.trading.validate()?;
        Ok(config)
    }
}
