//! Hybrid legal-risk detection over Japanese freelance service contracts.
//!
//! The deterministic half (catalog, matcher, clause checker, payment
//! calculator, engine, scorer) is pure and synchronous. The model-based
//! half sits behind the [`model::ContractAnalyzer`] boundary. The
//! [`service::AnalysisService`] fans out to both and joins them at the
//! [`merger`].

pub mod catalog;
pub mod clauses;
pub mod domain;
pub mod engine;
pub mod matcher;
pub mod merger;
pub mod model;
pub mod payment;
pub mod scorer;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{ClauseRequirement, DetectionRule, KnownBadEntry, Pattern, PatternLibrary};
pub use domain::{
    DeterministicScore, Finding, FindingSource, Grade, MergedResult, Remedy, RiskCategory,
    RiskLevel, RiskStats, RuleCheckResult, RuleReport,
};
pub use engine::RuleEngine;
pub use model::{ContractAnalyzer, ModelAnalysis, ModelFinding, OpenAiAnalyzer};
pub use payment::{PaymentTermAssessment, PaymentTermBasis};
pub use service::AnalysisService;
