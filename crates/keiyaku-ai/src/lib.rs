//! Hybrid legal-risk detection engine for freelance service contracts.
//!
//! The crate pairs a deterministic, rule-based scanner with an external
//! model-based analyzer. Both run concurrently over the same contract text;
//! their findings are reconciled into a single merged report, while the
//! numeric score is derived from the rule-based side alone so the same
//! document always grades identically.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;
