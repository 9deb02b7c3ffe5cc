//! End-to-end risk calculation scenarios

use crypto_sentinel::config::RiskParameters;
use crypto_sentinel::risk::{
    evaluate_risk_status, KellyOptimizer, PortfolioAssessor, PortfolioPosition, PositionSizer,
    RiskLevel, RiskSnapshot, SizingMethod,
};
use rust_decimal_macros::dec;

#[test]
fn test_scenario_fixed_percent_sizing_hits_cap() {
    // $10k balance, 2% risk, entry 50000, stop 48000:
    // risk amount $200, raw quantity 0.1, notional $5000 exceeds the
    // 20% cap ($2000) -> rescaled to 0.04 with reduced confidence
    let sizer = PositionSizer::from_params(&RiskParameters::default());
    let result = sizer
        .compute(
            dec!(10000),
            dec!(0.02),
            dec!(50000),
            dec!(48000),
            SizingMethod::FixedPercent,
        )
        .unwrap();

    assert_eq!(result.risk_amount, dec!(200));
    assert!(result.capped);
    assert_eq!(result.quantity, dec!(0.04));
    assert_eq!(result.notional_value, dec!(2000));
    assert_eq!(result.confidence, dec!(0.64));
}

#[test]
fn test_scenario_btc_heavy_portfolio_flags_high_correlation() {
    let positions = vec![
        PortfolioPosition::from_prices("BTCUSDT", dec!(0.1), dec!(40000), dec!(43000), dec!(0.5)),
        PortfolioPosition::from_prices("WBTCUSDT", dec!(0.1), dec!(40100), dec!(43100), dec!(0.5)),
    ];

    let assessor = PortfolioAssessor::new(RiskParameters::default());
    let analysis = assessor.assess_correlation(&positions);

    assert_eq!(analysis.max_correlation, 0.95);
    assert_eq!(analysis.risk_level, RiskLevel::High);
}

#[test]
fn test_scenario_kelly_clamps_favorable_edge() {
    // win rate 0.6, avg win 200, avg loss 100 -> b = 2.0,
    // raw kelly = (2*0.6 - 0.4)/2 = 0.4, clamped to 0.25
    let outcome = KellyOptimizer::default()
        .optimize(dec!(0.6), dec!(200), dec!(100))
        .unwrap();

    assert_eq!(outcome.odds_ratio, dec!(2));
    assert_eq!(outcome.raw_fraction, dec!(0.4));
    assert_eq!(outcome.optimal_fraction, dec!(0.25));
}

#[test]
fn test_full_assessment_produces_alerts_and_recommendations() {
    let positions = vec![
        PortfolioPosition::from_prices("BTCUSDT", dec!(0.5), dec!(40000), dec!(43000), dec!(0.6)),
        PortfolioPosition::from_prices("ETHUSDT", dec!(5), dec!(2200), dec!(2300), dec!(0.4)),
    ];
    // Large early gain followed by heavy losses drives a deep drawdown
    let history = vec![5000.0, -2000.0, -1500.0, -1000.0];

    let assessment = PortfolioAssessor::new(RiskParameters::default())
        .assess(&positions, dec!(30000), Some(&history))
        .unwrap();

    // Cumulative P&L falls from 5000 to 500 -> 90% drawdown, over the
    // 15% limit -> critical alert
    assert!(assessment.metrics.max_drawdown > 0.15);
    assert!(assessment
        .alerts
        .iter()
        .any(|a| a.metric == "max_drawdown"));
    assert_eq!(assessment.metrics.correlation_risk, RiskLevel::High);
    assert!(assessment
        .recommendations
        .iter()
        .any(|r| r.contains("Diversify")));
}

#[test]
fn test_drawdown_bounds_hold_for_any_history() {
    let assessor = PortfolioAssessor::new(RiskParameters::default());
    let histories: Vec<Vec<f64>> = vec![
        vec![],
        vec![100.0],
        vec![100.0, 200.0, 300.0],
        vec![1000.0, -999.0],
        vec![-50.0, -50.0, -50.0],
        vec![10.0, -1000.0, 500.0, -2000.0],
    ];

    for history in histories {
        let dd = assessor.max_drawdown(&history);
        assert!((0.0..=1.0).contains(&dd), "history {history:?} gave {dd}");
    }
}

#[test]
fn test_operational_risk_status_pipeline() {
    let report = evaluate_risk_status(&RiskSnapshot {
        current_drawdown: 0.12,
        daily_pnl: -1500.0,
        var_breaches: 2,
        correlation_level: RiskLevel::High,
    });

    // 30 (drawdown) + 20 (loss) + 15 (breaches) + 20 (correlation)
    assert_eq!(report.risk_score, 85);
    assert_eq!(report.risk_level, RiskLevel::High);
    assert!(!report.alerts.is_empty());
    assert!(!report.recommendations.is_empty());
}
