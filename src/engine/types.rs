//! Decision engine types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::signal::TradeAction;

/// Terminal output of one analysis cycle
///
/// `action` and the price/size fields are present iff `should_trade`
/// is true and the inputs allowed a full plan to be computed.
#[derive(Debug, Clone, Serialize)]
pub struct TradeDecision {
    /// Unique decision identifier
    pub id: Uuid,
    /// Decision timestamp
    pub timestamp: DateTime<Utc>,
    pub should_trade: bool,
    pub action: Option<TradeAction>,
    pub confidence: Decimal,
    pub entry_price: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub risk_amount: Option<Decimal>,
    /// Human-readable explanation of the decision
    pub reasoning: String,
    /// How many signal sources contributed usable data
    pub sources_available: usize,
    /// Set when the cycle was absorbed at the engine boundary
    pub error: Option<String>,
}

impl TradeDecision {
    /// A decision not to trade, with the reason
    pub fn no_trade(reason: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            should_trade: false,
            action: None,
            confidence: Decimal::ZERO,
            entry_price: None,
            quantity: None,
            stop_loss: None,
            take_profit: None,
            risk_amount: None,
            reasoning: reason.into(),
            sources_available: 0,
            error: None,
        }
    }

    /// A no-trade decision produced by absorbing an internal error
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        let mut decision = Self::no_trade(format!("Cycle aborted: {error}"));
        decision.error = Some(error);
        decision
    }

    /// A decision to trade
    #[allow(clippy::too_many_arguments)]
    pub fn trade(
        action: TradeAction,
        confidence: Decimal,
        entry_price: Decimal,
        quantity: Decimal,
        stop_loss: Decimal,
        take_profit: Option<Decimal>,
        risk_amount: Decimal,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            should_trade: true,
            action: Some(action),
            confidence,
            entry_price: Some(entry_price),
            quantity: Some(quantity),
            stop_loss: Some(stop_loss),
            take_profit,
            risk_amount: Some(risk_amount),
            reasoning: reasoning.into(),
            sources_available: 0,
            error: None,
        }
    }
}
