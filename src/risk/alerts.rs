//! Risk alert generation
//!
//! Two independent, stateless alert paths: metric-driven alerts from a
//! `RiskMetrics` against configured thresholds, and an operational path
//! that scores raw portfolio status scalars into a 0-100 risk score
//! with recommendations.

use serde::Serialize;
use tracing::debug;

use super::types::{AlertLevel, RiskAlert, RiskLevel, RiskMetrics};
use crate::config::RiskParameters;

/// Drawdown above this is critical
const CRITICAL_DRAWDOWN_THRESHOLD: f64 = 0.15;
/// Drawdown above this warrants a warning
const WARNING_DRAWDOWN_THRESHOLD: f64 = 0.10;
/// Drawdown above this triggers de-risking recommendations
const ELEVATED_DRAWDOWN_THRESHOLD: f64 = 0.08;
/// Daily loss considered significant
const SIGNIFICANT_DAILY_LOSS: f64 = 5000.0;
/// Daily loss that contributes to the risk score
const MODERATE_DAILY_LOSS: f64 = 1000.0;
/// VaR breach count above which a warning fires
const VAR_BREACH_WARNING_THRESHOLD: u32 = 2;
/// Drawdown contribution threshold for the risk score
const SCORE_DRAWDOWN_THRESHOLD: f64 = 0.05;
/// Sharpe ratio below this indicates poor risk-adjusted returns
const LOW_SHARPE_THRESHOLD: f64 = 0.5;

/// Generate alerts from portfolio metrics against risk parameters
///
/// Each rule is evaluated independently; the list may be empty.
/// `reference_balance` anchors the VaR threshold in account currency.
pub fn generate_alerts(
    metrics: &RiskMetrics,
    params: &RiskParameters,
    reference_balance: f64,
) -> Vec<RiskAlert> {
    let mut alerts = Vec::new();

    let max_portfolio_risk: f64 = params.max_portfolio_risk.try_into().unwrap_or(0.0);
    let var_threshold = max_portfolio_risk * reference_balance;
    if metrics.var_1d > var_threshold {
        alerts.push(RiskAlert::new(
            AlertLevel::Warning,
            format!("Portfolio VaR (${:.2}) exceeds risk threshold", metrics.var_1d),
            "var_1d",
            metrics.var_1d,
            var_threshold,
        ));
    }

    let max_drawdown: f64 = params.max_drawdown.try_into().unwrap_or(0.0);
    if metrics.max_drawdown > max_drawdown {
        alerts.push(RiskAlert::new(
            AlertLevel::Critical,
            format!(
                "Maximum drawdown ({:.1}%) exceeds limit ({:.1}%)",
                metrics.max_drawdown * 100.0,
                max_drawdown * 100.0
            ),
            "max_drawdown",
            metrics.max_drawdown,
            max_drawdown,
        ));
    }

    if metrics.correlation_risk == RiskLevel::High {
        alerts.push(RiskAlert::new(
            AlertLevel::Warning,
            "High correlation detected between positions - consider diversification",
            "correlation_risk",
            0.8,
            params.max_correlation.try_into().unwrap_or(0.0),
        ));
    }

    if let Some(sharpe) = metrics.sharpe_ratio {
        if sharpe < LOW_SHARPE_THRESHOLD {
            alerts.push(RiskAlert::new(
                AlertLevel::Warning,
                format!("Low Sharpe ratio ({sharpe:.2}) indicates poor risk-adjusted returns"),
                "sharpe_ratio",
                sharpe,
                LOW_SHARPE_THRESHOLD,
            ));
        }
    }

    debug!(alerts = alerts.len(), "generated metric alerts");
    alerts
}

/// Raw portfolio status scalars for the operational alert path
#[derive(Debug, Clone, Copy)]
pub struct RiskSnapshot {
    /// Current drawdown as a fraction (0.05 = 5%)
    pub current_drawdown: f64,
    /// Today's P&L in account currency
    pub daily_pnl: f64,
    /// Number of recent VaR breaches
    pub var_breaches: u32,
    /// Portfolio correlation classification
    pub correlation_level: RiskLevel,
}

/// Operational alert with a suggested action
#[derive(Debug, Clone, Serialize)]
pub struct OperationalAlert {
    pub level: AlertLevel,
    pub message: String,
    pub metric: &'static str,
    pub action_required: &'static str,
}

/// Result of evaluating a risk snapshot
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub risk_level: RiskLevel,
    /// Weighted sum of threshold breaches, 0-100
    pub risk_score: u32,
    pub alerts: Vec<OperationalAlert>,
    pub recommendations: Vec<String>,
}

/// Evaluate raw portfolio status against tiered thresholds
pub fn evaluate_risk_status(snapshot: &RiskSnapshot) -> RiskReport {
    let mut alerts = Vec::new();
    let mut recommendations = Vec::new();

    if snapshot.current_drawdown > CRITICAL_DRAWDOWN_THRESHOLD {
        alerts.push(OperationalAlert {
            level: AlertLevel::Critical,
            message: format!(
                "Critical drawdown level reached: {:.1}%",
                snapshot.current_drawdown * 100.0
            ),
            metric: "drawdown",
            action_required: "Consider reducing position sizes or stopping trading",
        });
    } else if snapshot.current_drawdown > WARNING_DRAWDOWN_THRESHOLD {
        alerts.push(OperationalAlert {
            level: AlertLevel::Warning,
            message: format!("Elevated drawdown: {:.1}%", snapshot.current_drawdown * 100.0),
            metric: "drawdown",
            action_required: "Monitor closely and review risk management",
        });
    }

    if snapshot.daily_pnl < -SIGNIFICANT_DAILY_LOSS {
        alerts.push(OperationalAlert {
            level: AlertLevel::Warning,
            message: format!("Significant daily loss: ${:.2}", snapshot.daily_pnl),
            metric: "daily_pnl",
            action_required: "Review trading decisions and market conditions",
        });
    }

    if snapshot.var_breaches > VAR_BREACH_WARNING_THRESHOLD {
        alerts.push(OperationalAlert {
            level: AlertLevel::Warning,
            message: format!("Multiple VaR breaches detected: {}", snapshot.var_breaches),
            metric: "var_breaches",
            action_required: "Review risk model and position sizing",
        });
    }

    if snapshot.correlation_level == RiskLevel::High {
        alerts.push(OperationalAlert {
            level: AlertLevel::Warning,
            message: "High correlation between positions detected".to_string(),
            metric: "correlation",
            action_required: "Diversify portfolio to reduce systematic risk",
        });
    }

    if snapshot.current_drawdown > ELEVATED_DRAWDOWN_THRESHOLD {
        recommendations.push("Reduce position sizes by 25-50%".to_string());
        recommendations.push("Tighten stop-loss levels".to_string());
    }
    if snapshot.correlation_level == RiskLevel::High {
        recommendations.push("Add uncorrelated assets to portfolio".to_string());
        recommendations.push("Consider market-neutral strategies".to_string());
    }
    if snapshot.var_breaches > 1 {
        recommendations.push("Recalibrate risk model parameters".to_string());
        recommendations.push("Review historical volatility assumptions".to_string());
    }

    let mut risk_score = 0u32;
    if snapshot.current_drawdown > SCORE_DRAWDOWN_THRESHOLD {
        risk_score += 30;
    }
    if snapshot.daily_pnl < -MODERATE_DAILY_LOSS {
        risk_score += 20;
    }
    if snapshot.var_breaches > 0 {
        risk_score += 15;
    }
    if snapshot.correlation_level == RiskLevel::High {
        risk_score += 20;
    }
    let risk_score = risk_score.min(100);

    let risk_level = if risk_score < 25 {
        RiskLevel::Low
    } else if risk_score < 60 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    RiskReport {
        risk_level,
        risk_score,
        alerts,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn metrics(var_1d: f64, max_drawdown: f64, sharpe: Option<f64>, corr: RiskLevel) -> RiskMetrics {
        RiskMetrics {
            var_1d,
            max_drawdown,
            sharpe_ratio: sharpe,
            portfolio_beta: None,
            correlation_risk: corr,
        }
    }

    #[test]
    fn test_no_alerts_for_healthy_portfolio() {
        let m = metrics(100.0, 0.02, Some(1.5), RiskLevel::Low);
        let alerts = generate_alerts(&m, &RiskParameters::default(), 100_000.0);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_var_alert() {
        // Threshold = 0.02 * 100000 = 2000
        let m = metrics(2500.0, 0.02, None, RiskLevel::Low);
        let alerts = generate_alerts(&m, &RiskParameters::default(), 100_000.0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert_eq!(alerts[0].metric, "var_1d");
        assert_eq!(alerts[0].threshold, 2000.0);
    }

    #[test]
    fn test_drawdown_alert_is_critical() {
        let m = metrics(0.0, 0.20, None, RiskLevel::Low);
        let alerts = generate_alerts(&m, &RiskParameters::default(), 100_000.0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts[0].metric, "max_drawdown");
    }

    #[test]
    fn test_all_rules_evaluated_independently() {
        let m = metrics(5000.0, 0.30, Some(0.1), RiskLevel::High);
        let alerts = generate_alerts(&m, &RiskParameters::default(), 100_000.0);
        // VaR + drawdown + correlation + Sharpe, no early exit
        assert_eq!(alerts.len(), 4);
    }

    #[test]
    fn test_sharpe_alert_only_when_present() {
        let m = metrics(0.0, 0.0, None, RiskLevel::Low);
        assert!(generate_alerts(&m, &RiskParameters::default(), 100_000.0).is_empty());

        let m = metrics(0.0, 0.0, Some(0.2), RiskLevel::Low);
        let alerts = generate_alerts(&m, &RiskParameters::default(), 100_000.0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, "sharpe_ratio");
    }

    #[test]
    fn test_custom_drawdown_limit() {
        let params = RiskParameters {
            max_drawdown: dec!(0.05),
            ..RiskParameters::default()
        };
        let m = metrics(0.0, 0.08, None, RiskLevel::Low);
        let alerts = generate_alerts(&m, &params, 100_000.0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
    }

    fn quiet_snapshot() -> RiskSnapshot {
        RiskSnapshot {
            current_drawdown: 0.01,
            daily_pnl: 50.0,
            var_breaches: 0,
            correlation_level: RiskLevel::Low,
        }
    }

    #[test]
    fn test_status_quiet() {
        let report = evaluate_risk_status(&quiet_snapshot());
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.risk_level, RiskLevel::Low);
        assert!(report.alerts.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_status_critical_drawdown() {
        let report = evaluate_risk_status(&RiskSnapshot {
            current_drawdown: 0.18,
            ..quiet_snapshot()
        });
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].level, AlertLevel::Critical);
        // Drawdown breach alone scores 30 -> medium
        assert_eq!(report.risk_score, 30);
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Reduce position sizes")));
    }

    #[test]
    fn test_status_warning_drawdown_tier() {
        let report = evaluate_risk_status(&RiskSnapshot {
            current_drawdown: 0.12,
            ..quiet_snapshot()
        });
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].level, AlertLevel::Warning);
    }

    #[test]
    fn test_status_everything_breached() {
        let report = evaluate_risk_status(&RiskSnapshot {
            current_drawdown: 0.20,
            daily_pnl: -6000.0,
            var_breaches: 3,
            correlation_level: RiskLevel::High,
        });
        // 30 + 20 + 15 + 20
        assert_eq!(report.risk_score, 85);
        assert_eq!(report.risk_level, RiskLevel::High);
        assert_eq!(report.alerts.len(), 4);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Recalibrate")));
    }

    #[test]
    fn test_status_moderate_loss_scores_without_alert() {
        // $2k loss breaches the score threshold but not the $5k alert tier
        let report = evaluate_risk_status(&RiskSnapshot {
            daily_pnl: -2000.0,
            ..quiet_snapshot()
        });
        assert!(report.alerts.is_empty());
        assert_eq!(report.risk_score, 20);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_status_single_var_breach_scores_quietly() {
        let report = evaluate_risk_status(&RiskSnapshot {
            var_breaches: 1,
            ..quiet_snapshot()
        });
        assert!(report.alerts.is_empty());
        assert_eq!(report.risk_score, 15);
    }
}
