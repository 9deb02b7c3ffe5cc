//! End-to-end decision synthesis scenarios

use async_trait::async_trait;
use crypto_sentinel::config::{RiskParameters, TradingConfig};
use crypto_sentinel::engine::{DecisionEngine, SignalAdvisor};
use crypto_sentinel::signal::{
    AiSignal, MarketSnapshot, NewsSummary, RiskTolerance, SignalSet, SocialSummary,
    TechnicalOutlook, TechnicalSummary, TradeAction,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Deterministic AI fixture
struct FixtureAdvisor {
    response: Result<AiSignal, String>,
}

#[async_trait]
impl SignalAdvisor for FixtureAdvisor {
    async fn advise(&self, _: &SignalSet, _: RiskTolerance) -> anyhow::Result<AiSignal> {
        self.response
            .clone()
            .map_err(|e| anyhow::anyhow!("{e}"))
    }
}

fn directional_signals() -> SignalSet {
    SignalSet::default()
        .with_technical(TechnicalSummary::new(TechnicalOutlook::Bullish, dec!(0.8)))
        .with_news(NewsSummary::new(dec!(0.5), dec!(0.7)))
        .with_social(SocialSummary::new(dec!(0.4)))
        .with_market(MarketSnapshot { price: dec!(50000) })
}

#[tokio::test]
async fn test_scenario_fallback_confidence_gate() {
    // technical bullish (+0.6), news 0.5*0.5, social 0.4*0.4:
    // score = 1.01/3 ≈ 0.337 -> clears the 0.3 buy threshold, but
    // confidence ≈ 0.637 stays under min_confidence 0.7 -> no trade
    let engine = DecisionEngine::new(TradingConfig::default(), RiskParameters::default());
    let decision = engine.decide(&directional_signals(), dec!(10000)).await;

    assert!(!decision.should_trade);
    assert_eq!(decision.reasoning, "No clear signal");
    assert_eq!(decision.sources_available, 4);
}

#[tokio::test]
async fn test_scenario_fallback_trades_with_lower_gate() {
    let trading = TradingConfig {
        min_confidence: dec!(0.6),
        ..TradingConfig::default()
    };
    let engine = DecisionEngine::new(trading, RiskParameters::default());
    let decision = engine.decide(&directional_signals(), dec!(10000)).await;

    assert!(decision.should_trade);
    assert_eq!(decision.action, Some(TradeAction::Buy));
    assert!(decision.confidence < dec!(0.7));
    // Full execution plan from the sized fallback
    assert_eq!(decision.entry_price, Some(dec!(50000)));
    assert!(decision.quantity.unwrap() > Decimal::ZERO);
    assert!(decision.stop_loss.unwrap() < dec!(50000));
}

#[tokio::test]
async fn test_ai_priority_over_rule_fallback() {
    // The rule-based score would say buy, but the reachable AI is
    // unconfident: the engine must not consult the rules at all.
    let trading = TradingConfig {
        min_confidence: dec!(0.5),
        ..TradingConfig::default()
    };
    let engine = DecisionEngine::new(trading, RiskParameters::default()).with_advisor(Arc::new(
        FixtureAdvisor {
            response: Ok(AiSignal {
                action: TradeAction::Buy,
                confidence: dec!(0.3),
                reasoning: "weak conviction".to_string(),
                target_price: None,
                stop_loss: None,
            }),
        },
    ));
    let decision = engine.decide(&directional_signals(), dec!(10000)).await;

    assert!(!decision.should_trade);
    assert!(decision.reasoning.contains("below threshold"));
}

#[tokio::test]
async fn test_ai_outage_degrades_to_rules() {
    let trading = TradingConfig {
        min_confidence: dec!(0.6),
        ..TradingConfig::default()
    };
    let engine = DecisionEngine::new(trading, RiskParameters::default()).with_advisor(Arc::new(
        FixtureAdvisor {
            response: Err("upstream unreachable".to_string()),
        },
    ));
    let decision = engine.decide(&directional_signals(), dec!(10000)).await;

    assert!(decision.should_trade);
    assert!(decision.reasoning.starts_with("Rule-based decision"));
}

#[tokio::test]
async fn test_confident_ai_produces_full_plan() {
    let engine = DecisionEngine::new(TradingConfig::default(), RiskParameters::default())
        .with_advisor(Arc::new(FixtureAdvisor {
            response: Ok(AiSignal {
                action: TradeAction::Buy,
                confidence: dec!(0.85),
                reasoning: "breakout with rising volume".to_string(),
                target_price: Some(dec!(54000)),
                stop_loss: Some(dec!(48000)),
            }),
        }));
    let decision = engine.decide(&directional_signals(), dec!(10000)).await;

    assert!(decision.should_trade);
    assert_eq!(decision.action, Some(TradeAction::Buy));
    assert_eq!(decision.entry_price, Some(dec!(50000)));
    assert_eq!(decision.stop_loss, Some(dec!(48000)));
    assert_eq!(decision.take_profit, Some(dec!(54000)));
    // Risk amount = 2% of balance
    assert_eq!(decision.risk_amount, Some(dec!(200)));
    // Notional respects the 20% cap: quantity <= 2000/50000
    assert!(decision.quantity.unwrap() <= dec!(0.04));
}

#[tokio::test]
async fn test_decision_cycles_are_independent() {
    // Concurrent cycles over the same engine must not interfere;
    // the engine owns no shared mutable state.
    let engine = Arc::new(DecisionEngine::new(
        TradingConfig::default(),
        RiskParameters::default(),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.decide(&directional_signals(), dec!(10000)).await
        }));
    }

    for handle in handles {
        let decision = handle.await.unwrap();
        assert!(!decision.should_trade);
        assert_eq!(decision.reasoning, "No clear signal");
    }
}
