//! Signal types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Trading action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl TradeAction {
    /// Whether this action opens a position
    pub fn is_directional(&self) -> bool {
        matches!(self, TradeAction::Buy | TradeAction::Sell)
    }
}

/// Overall direction reported by technical analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechnicalOutlook {
    Bullish,
    Bearish,
    Neutral,
}

/// Risk tolerance passed to the AI collaborator
///
/// Determines both the minimum confidence required to trade and a
/// scaling factor applied to the AI's raw confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        }
    }

    /// Minimum confidence required to act on an AI signal
    pub fn min_confidence(&self) -> Decimal {
        match self {
            RiskTolerance::Low => dec!(0.8),
            RiskTolerance::Medium => dec!(0.7),
            RiskTolerance::High => dec!(0.5),
        }
    }

    /// Scale a raw AI confidence for this tolerance, clamped to [0, 1]
    pub fn adjust_confidence(&self, confidence: Decimal) -> Decimal {
        let scale = match self {
            RiskTolerance::Low => dec!(0.8),
            RiskTolerance::Medium => dec!(1.0),
            RiskTolerance::High => dec!(1.2),
        };
        clamp_unit(confidence * scale)
    }
}

/// Clamp a confidence-like value to [0, 1]
pub(crate) fn clamp_unit(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE)
}

/// Clamp a sentiment-like value to [-1, 1]
pub(crate) fn clamp_signed_unit(value: Decimal) -> Decimal {
    value.max(dec!(-1)).min(Decimal::ONE)
}

/// Technical analysis summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSummary {
    /// Overall direction across indicators
    pub overall_signal: TechnicalOutlook,
    /// Confidence in the overall signal
    pub confidence: Decimal,
}

impl TechnicalSummary {
    pub fn new(overall_signal: TechnicalOutlook, confidence: Decimal) -> Self {
        Self {
            overall_signal,
            confidence: clamp_unit(confidence),
        }
    }
}

/// News sentiment summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSummary {
    /// Aggregate sentiment in [-1, 1]
    pub overall_sentiment: Decimal,
    /// Confidence in the sentiment estimate
    pub confidence: Decimal,
}

impl NewsSummary {
    pub fn new(overall_sentiment: Decimal, confidence: Decimal) -> Self {
        Self {
            overall_sentiment: clamp_signed_unit(overall_sentiment),
            confidence: clamp_unit(confidence),
        }
    }
}

/// Social sentiment summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialSummary {
    /// Aggregate sentiment in [-1, 1]
    pub overall_sentiment: Decimal,
}

impl SocialSummary {
    pub fn new(overall_sentiment: Decimal) -> Self {
        Self {
            overall_sentiment: clamp_signed_unit(overall_sentiment),
        }
    }
}

/// Spot market snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Last traded price
    pub price: Decimal,
}

/// Recommendation returned by the AI collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSignal {
    /// Recommended action
    pub action: TradeAction,
    /// Raw confidence before risk-tolerance adjustment
    pub confidence: Decimal,
    /// Human-readable reasoning
    pub reasoning: String,
    /// Price target, if the model produced one
    pub target_price: Option<Decimal>,
    /// Suggested stop loss, if the model produced one
    pub stop_loss: Option<Decimal>,
}

/// A source that was reachable but returned a failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFailure {
    pub error: String,
}

impl std::fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Outcome of querying a single analysis source
pub type SourceResult<T> = Result<T, SourceFailure>;

/// Per-source result bag for one analysis cycle
///
/// Each source is independently optional: `None` means the source was
/// never queried, `Some(Err(_))` means it was queried and failed. The
/// decision engine treats both states identically ("source
/// unavailable"), so the accessors below flatten them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalSet {
    pub technical: Option<SourceResult<TechnicalSummary>>,
    pub news: Option<SourceResult<NewsSummary>>,
    pub social: Option<SourceResult<SocialSummary>>,
    pub market: Option<SourceResult<MarketSnapshot>>,
}

impl SignalSet {
    pub fn technical(&self) -> Option<&TechnicalSummary> {
        self.technical.as_ref().and_then(|r| r.as_ref().ok())
    }

    pub fn news(&self) -> Option<&NewsSummary> {
        self.news.as_ref().and_then(|r| r.as_ref().ok())
    }

    pub fn social(&self) -> Option<&SocialSummary> {
        self.social.as_ref().and_then(|r| r.as_ref().ok())
    }

    pub fn market(&self) -> Option<&MarketSnapshot> {
        self.market.as_ref().and_then(|r| r.as_ref().ok())
    }

    /// Number of sources that returned usable data
    pub fn sources_available(&self) -> usize {
        [
            self.technical().is_some(),
            self.news().is_some(),
            self.social().is_some(),
            self.market().is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn with_technical(mut self, summary: TechnicalSummary) -> Self {
        self.technical = Some(Ok(summary));
        self
    }

    pub fn with_news(mut self, summary: NewsSummary) -> Self {
        self.news = Some(Ok(summary));
        self
    }

    pub fn with_social(mut self, summary: SocialSummary) -> Self {
        self.social = Some(Ok(summary));
        self
    }

    pub fn with_market(mut self, snapshot: MarketSnapshot) -> Self {
        self.market = Some(Ok(snapshot));
        self
    }
}
