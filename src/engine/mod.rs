//! Decision engine module
//!
//! Synthesizes per-source signals into a single trade/no-trade decision.
//! The engine is the error-containment boundary: everything below it
//! either succeeds or is absorbed into a no-trade decision.

mod collaborator;
mod decision;
mod types;

pub use collaborator::SignalAdvisor;
pub use decision::DecisionEngine;
pub use types::TradeDecision;
