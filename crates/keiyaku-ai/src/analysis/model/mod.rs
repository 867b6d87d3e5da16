//! Boundary to the model-based contract analyzer.
//!
//! The collaborator is reached through the [`ContractAnalyzer`] trait so the
//! orchestration layer and its tests can substitute a double. The production
//! implementation lives in [`openai`].

mod openai;

pub use openai::OpenAiAnalyzer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{Remedy, RiskCategory, RiskLevel};
use crate::error::AnalysisError;

/// Asynchronous collaborator producing the probabilistic half of the hybrid
/// analysis. Failures propagate as typed errors; no default is substituted.
#[async_trait]
pub trait ContractAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<ModelAnalysis, AnalysisError>;
}

/// Structured response of one model-based analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAnalysis {
    pub summary: String,
    pub contract_type: String,
    #[serde(default)]
    pub findings: Vec<ModelFinding>,
    #[serde(default)]
    pub missing_clauses: Vec<String>,
}

/// One finding as reported by the model. Less constrained than the rule
/// side: the category may fall outside the curated set and references may be
/// worded freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFinding {
    pub category: RiskCategory,
    pub risk_level: RiskLevel,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub explanation: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub remedy: Option<Remedy>,
}
