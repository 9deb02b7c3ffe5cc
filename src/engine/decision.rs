//! Decision synthesis
//!
//! AI-priority path with a risk-tolerance confidence gate, and a
//! weighted rule-based fallback when the AI collaborator is
//! unreachable. One bad cycle must never halt the trading loop: every
//! internal failure is absorbed into a no-trade decision here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::collaborator::SignalAdvisor;
use super::types::TradeDecision;
use crate::config::{RiskParameters, TradingConfig};
use crate::risk::{PositionSizer, RiskError};
use crate::signal::{AiSignal, SignalSet, TechnicalOutlook, TradeAction};
use crate::telemetry;

/// Rule-based score above which a buy is indicated
const RULE_BUY_THRESHOLD: Decimal = dec!(0.3);
/// Rule-based score below which a sell is indicated
const RULE_SELL_THRESHOLD: Decimal = dec!(-0.3);
/// Confidence boost added to the absolute rule score
const RULE_CONFIDENCE_BOOST: Decimal = dec!(0.3);
/// Ceiling on rule-based confidence
const MAX_RULE_CONFIDENCE: Decimal = dec!(0.8);

/// Multi-source signal synthesizer
///
/// Holds no mutable state: each call to [`decide`](Self::decide) is an
/// independent computation over immutable inputs, safe to run
/// concurrently from any number of tasks.
pub struct DecisionEngine {
    trading: TradingConfig,
    risk_params: RiskParameters,
    sizer: PositionSizer,
    advisor: Option<Arc<dyn SignalAdvisor>>,
}

impl DecisionEngine {
    pub fn new(trading: TradingConfig, risk_params: RiskParameters) -> Self {
        let sizer = PositionSizer::from_params(&risk_params);
        Self {
            trading,
            risk_params,
            sizer,
            advisor: None,
        }
    }

    /// Attach an AI collaborator; without one every cycle uses the
    /// rule-based fallback
    pub fn with_advisor(mut self, advisor: Arc<dyn SignalAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Synthesize one trade decision from the available signals
    ///
    /// Never fails: validation and domain errors below this boundary
    /// are converted into a no-trade decision carrying the error.
    pub async fn decide(&self, signals: &SignalSet, account_balance: Decimal) -> TradeDecision {
        let mut decision = match self.decide_inner(signals, account_balance).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(error = %e, "analysis cycle absorbed an internal error");
                TradeDecision::failed(e.to_string())
            }
        };
        decision.sources_available = signals.sources_available();

        telemetry::record_decision(if decision.should_trade { "trade" } else { "no_trade" });
        info!(
            should_trade = decision.should_trade,
            confidence = %decision.confidence,
            sources = decision.sources_available,
            "decision cycle complete"
        );
        decision
    }

    async fn decide_inner(
        &self,
        signals: &SignalSet,
        account_balance: Decimal,
    ) -> Result<TradeDecision, RiskError> {
        if let Some(advisor) = &self.advisor {
            match advisor.advise(signals, self.trading.risk_tolerance).await {
                // A reachable AI short-circuits: a low-confidence answer
                // means no trade, never a fall-through to the rules.
                Ok(ai) => return self.ai_decision(ai, signals, account_balance),
                Err(e) => {
                    warn!(error = %e, "AI collaborator unavailable, using rule-based fallback");
                }
            }
        }

        self.rule_based_decision(signals, account_balance)
    }

    fn ai_decision(
        &self,
        ai: AiSignal,
        signals: &SignalSet,
        account_balance: Decimal,
    ) -> Result<TradeDecision, RiskError> {
        let tolerance = self.trading.risk_tolerance;
        let confidence = tolerance.adjust_confidence(ai.confidence);

        if confidence < tolerance.min_confidence() {
            info!(
                confidence = %confidence.round_dp(2),
                threshold = %tolerance.min_confidence(),
                "AI signal below confidence threshold"
            );
            return Ok(TradeDecision::no_trade(format!(
                "Signal confidence ({}) below threshold for {} risk tolerance",
                confidence.round_dp(2),
                tolerance.as_str()
            )));
        }

        if !ai.action.is_directional() {
            return Ok(TradeDecision::no_trade("AI recommends holding"));
        }

        let Some(market) = signals.market() else {
            return Ok(TradeDecision::no_trade(
                "Market price unavailable for position sizing",
            ));
        };
        let entry_price = market.price;

        let stop_loss = ai
            .stop_loss
            .filter(|stop| *stop > Decimal::ZERO)
            .unwrap_or_else(|| self.default_stop(entry_price, ai.action));

        let size = self.sizer.compute(
            account_balance,
            self.trading.risk_per_trade,
            entry_price,
            stop_loss,
            self.trading.sizing_method,
        )?;

        let take_profit = ai
            .target_price
            .or_else(|| self.default_target(entry_price, stop_loss, ai.action));

        Ok(TradeDecision::trade(
            ai.action,
            confidence,
            entry_price,
            size.quantity,
            stop_loss,
            take_profit,
            size.risk_amount,
            ai.reasoning,
        ))
    }

    fn rule_based_decision(
        &self,
        signals: &SignalSet,
        account_balance: Decimal,
    ) -> Result<TradeDecision, RiskError> {
        debug!("using rule-based decision");

        let mut scores: Vec<Decimal> = Vec::new();

        if let Some(technical) = signals.technical() {
            match technical.overall_signal {
                TechnicalOutlook::Bullish => scores.push(self.trading.technical_weight),
                TechnicalOutlook::Bearish => scores.push(-self.trading.technical_weight),
                TechnicalOutlook::Neutral => {}
            }
        }
        if let Some(news) = signals.news() {
            scores.push(news.overall_sentiment * self.trading.news_weight);
        }
        if let Some(social) = signals.social() {
            scores.push(social.overall_sentiment * self.trading.social_weight);
        }

        if scores.is_empty() {
            return Ok(TradeDecision::no_trade("No valid analysis data"));
        }

        let overall_score = scores.iter().sum::<Decimal>() / Decimal::from(scores.len());
        let confidence = MAX_RULE_CONFIDENCE.min(overall_score.abs() + RULE_CONFIDENCE_BOOST);

        let action = if overall_score > RULE_BUY_THRESHOLD && confidence >= self.trading.min_confidence
        {
            TradeAction::Buy
        } else if overall_score < RULE_SELL_THRESHOLD && confidence >= self.trading.min_confidence {
            TradeAction::Sell
        } else {
            debug!(score = %overall_score.round_dp(2), confidence = %confidence.round_dp(2), "no clear signal");
            return Ok(TradeDecision::no_trade("No clear signal"));
        };

        let reasoning = format!(
            "Rule-based decision: score={}, confidence={}",
            overall_score.round_dp(2),
            confidence.round_dp(2)
        );

        // Size the trade when a market price is available; without one
        // the decision still stands but carries no execution plan.
        if let Some(market) = signals.market() {
            let entry_price = market.price;
            let stop_loss = self.default_stop(entry_price, action);
            let size = self.sizer.compute(
                account_balance,
                self.trading.risk_per_trade,
                entry_price,
                stop_loss,
                self.trading.sizing_method,
            )?;
            let take_profit = self.default_target(entry_price, stop_loss, action);

            return Ok(TradeDecision::trade(
                action,
                confidence,
                entry_price,
                size.quantity,
                stop_loss,
                take_profit,
                size.risk_amount,
                reasoning,
            ));
        }

        let mut decision = TradeDecision::trade(
            action,
            confidence,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            Decimal::ZERO,
            reasoning,
        );
        decision.entry_price = None;
        decision.quantity = None;
        decision.stop_loss = None;
        decision.risk_amount = None;
        Ok(decision)
    }

    fn default_stop(&self, entry_price: Decimal, action: TradeAction) -> Decimal {
        match action {
            TradeAction::Sell => entry_price * (Decimal::ONE + self.risk_params.stop_loss_percent),
            _ => entry_price * (Decimal::ONE - self.risk_params.stop_loss_percent),
        }
    }

    fn default_target(
        &self,
        entry_price: Decimal,
        stop_loss: Decimal,
        action: TradeAction,
    ) -> Option<Decimal> {
        let price_risk = (entry_price - stop_loss).abs();
        let distance = price_risk * self.risk_params.take_profit_ratio;
        match action {
            TradeAction::Buy => Some(entry_price + distance),
            TradeAction::Sell => Some(entry_price - distance),
            TradeAction::Hold => None,
        }
    }
}
