//! AI collaborator seam

use async_trait::async_trait;

use crate::signal::{AiSignal, RiskTolerance, SignalSet};

/// External AI synthesis service
///
/// The engine must not know whether it is talking to a real service or
/// a fixture; any error from `advise` is treated as "AI unavailable"
/// and routes the cycle to the rule-based fallback.
#[async_trait]
pub trait SignalAdvisor: Send + Sync {
    /// Request a trade recommendation synthesized from the signal set
    async fn advise(
        &self,
        signals: &SignalSet,
        risk_tolerance: RiskTolerance,
    ) -> anyhow::Result<AiSignal>;
}
