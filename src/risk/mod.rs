//! Risk management module
//!
//! Position sizing, portfolio risk metrics, alert generation, and
//! Kelly optimization. Everything here is pure computation over
//! caller-supplied inputs; no shared mutable state.

mod alerts;
mod kelly;
mod portfolio;
mod sizing;
mod stats;
mod types;

pub use alerts::{evaluate_risk_status, generate_alerts, OperationalAlert, RiskReport, RiskSnapshot};
pub use kelly::{KellyOptimizer, KellyOutcome, SizeRecommendation};
pub use portfolio::{
    CorrelationEstimator, PortfolioAssessment, PortfolioAssessor, SymbolHeuristicCorrelation,
};
pub use sizing::{PositionSizer, SizeAudit, SizingMethod, MAX_KELLY_FRACTION};
pub use types::{
    AlertLevel, CorrelationAnalysis, PortfolioPosition, PositionSizeResult, RiskAlert, RiskError,
    RiskLevel, RiskMetrics,
};
