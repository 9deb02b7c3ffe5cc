//! crypto-sentinel: risk-managed decision engine for crypto trading
//!
//! This library provides the core components for:
//! - Position sizing under fixed-percent, Kelly, and volatility methods
//! - Portfolio risk assessment (VaR, drawdown, Sharpe, correlation)
//! - Threshold-driven risk alerts and recommendations
//! - Kelly criterion optimization with risk-of-ruin estimates
//! - Multi-source signal synthesis with an AI-priority decision path
//!   and a rule-based fallback
//!
//! The crate owns no I/O: signal gathering, order execution, and the AI
//! backend are external collaborators injected at the trait seams.

pub mod config;
pub mod engine;
pub mod risk;
pub mod signal;
pub mod telemetry;
