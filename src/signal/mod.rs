//! Signal value objects
//!
//! Per-source analysis results assembled by the orchestrator and
//! consumed read-only by the decision engine

mod types;

pub use types::{
    AiSignal, MarketSnapshot, NewsSummary, RiskTolerance, SignalSet, SocialSummary, SourceFailure,
    SourceResult, TechnicalOutlook, TechnicalSummary, TradeAction,
};
