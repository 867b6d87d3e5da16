use serde::{Deserialize, Serialize};

use super::payment::PaymentTermAssessment;

/// Severity of a detected risk. The variant order is load-bearing: the
/// derived `Ord` ranks `Critical` above `High` above `Medium` above `Low`,
/// which drives finding sort order and merge tie-breaking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "低",
            RiskLevel::Medium => "中",
            RiskLevel::High => "高",
            RiskLevel::Critical => "重大",
        }
    }
}

/// Subject area of a finding. `Other` absorbs category tags the model-based
/// analyzer invents beyond the curated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Payment,
    Liability,
    ProhibitedActs,
    Copyright,
    DisguisedEmployment,
    NonCompete,
    Scope,
    Conformity,
    Jurisdiction,
    AiUsage,
    Acceptance,
    #[serde(other)]
    Other,
}

impl RiskCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Payment => "支払条件",
            RiskCategory::Liability => "損害賠償",
            RiskCategory::ProhibitedActs => "禁止行為",
            RiskCategory::Copyright => "知的財産権",
            RiskCategory::DisguisedEmployment => "偽装請負",
            RiskCategory::NonCompete => "競業避止",
            RiskCategory::Scope => "業務範囲",
            RiskCategory::Conformity => "契約不適合",
            RiskCategory::Jurisdiction => "合意管轄",
            RiskCategory::AiUsage => "AI利用",
            RiskCategory::Acceptance => "検収",
            RiskCategory::Other => "その他",
        }
    }

    /// Every catalog-backed category, in catalog order.
    pub const CURATED: [RiskCategory; 11] = [
        RiskCategory::Payment,
        RiskCategory::Liability,
        RiskCategory::ProhibitedActs,
        RiskCategory::Copyright,
        RiskCategory::DisguisedEmployment,
        RiskCategory::NonCompete,
        RiskCategory::Scope,
        RiskCategory::Conformity,
        RiskCategory::Jurisdiction,
        RiskCategory::AiUsage,
        RiskCategory::Acceptance,
    ];
}

/// Which side of the hybrid pipeline produced a finding. `Both` is assigned
/// only by the merger, never by a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSource {
    Rule,
    Model,
    Both,
}

/// Concrete repair guidance attached to a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remedy {
    /// Replacement clause text the contract holder can propose.
    pub revised_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negotiation_soft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negotiation_firm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
}

/// One detected risk or absence, with provenance, severity, and remedy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub source: FindingSource,
    pub category: RiskCategory,
    pub risk_level: RiskLevel,
    pub title: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legal_references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remedy: Option<Remedy>,
}

/// Count of findings at each severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskStats {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl RiskStats {
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Critical => self.critical += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::Low => self.low += 1,
        }
    }

    pub fn tally<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut stats = Self::default();
        for finding in findings {
            stats.record(finding.risk_level);
        }
        stats
    }

    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }
}

/// Complete deterministic output for one contract text. Produced fresh per
/// run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCheckResult {
    /// Rule findings sorted by severity; ties keep detection order.
    pub findings: Vec<Finding>,
    pub stats: RiskStats,
    pub payment: PaymentTermAssessment,
    pub missing_required: Vec<String>,
    pub missing_recommended: Vec<String>,
}

/// Letter grade bands over the deterministic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "A（良好）",
            Grade::B => "B（おおむね良好）",
            Grade::C => "C（要注意）",
            Grade::D => "D（要修正）",
            Grade::F => "F（危険）",
        }
    }
}

/// Reproducible 0-100 score derived from rule findings only. Model-sourced
/// findings never feed into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicScore {
    pub score: u8,
    pub grade: Grade,
    pub breakdown: RiskStats,
    pub commentary: String,
}

/// Rule-only report: the deterministic result plus its score, with no
/// model-based input. This is the opt-in path for callers that cannot or do
/// not want to reach the external analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleReport {
    pub result: RuleCheckResult,
    pub score: DeterministicScore,
}

/// Final reconciled output of one hybrid analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedResult {
    /// Free-text summary from the model-based analyzer.
    pub summary: String,
    /// Contract-type classification from the model-based analyzer.
    pub classification: String,
    /// Merged findings sorted by severity.
    pub findings: Vec<Finding>,
    /// Union of missing-clause labels from both sources, first occurrence
    /// kept.
    pub missing_clauses: Vec<String>,
    /// Severity counts over the merged finding list.
    pub stats: RiskStats,
    pub deterministic_score: DeterministicScore,
}
