//! Deterministic orchestrator over the matcher, the payment-term
//! calculator, and the clause presence checker.

use std::cmp::Reverse;

use super::catalog::PatternLibrary;
use super::clauses::{absence_finding, ClauseChecker};
use super::domain::{
    Finding, FindingSource, Remedy, RiskCategory, RiskLevel, RiskStats, RuleCheckResult,
};
use super::matcher::PatternMatcher;
use super::payment::{self, PaymentTermAssessment, PAYMENT_TERM_REFERENCE};

/// Identifier of the finding the payment-term calculator contributes.
pub const PAYMENT_TERM_FINDING_ID: &str = "payment-term-evaluation";

/// Synchronous, pure rule engine. Must not fail for any input; empty or
/// non-contract text simply reports every expected topic as absent.
#[derive(Clone, Copy)]
pub struct RuleEngine {
    library: &'static PatternLibrary,
}

impl RuleEngine {
    /// Engine over the embedded standard catalogs.
    pub fn standard() -> Self {
        Self {
            library: PatternLibrary::standard(),
        }
    }

    pub fn library(&self) -> &'static PatternLibrary {
        self.library
    }

    /// Runs the full deterministic pass. Findings are sorted by severity;
    /// ties keep encounter order (patterns in catalog order, then the
    /// payment evaluation, then required and recommended absences).
    pub fn run(&self, text: &str) -> RuleCheckResult {
        let mut findings = PatternMatcher::new(self.library).scan(text);

        let payment = payment::assess(text);
        if let Some(payment_finding) = payment_finding(&payment) {
            if payment.violates_60_day_rule {
                // One over-ceiling clause must not be counted twice: the
                // calculator wins over its static catalog twin.
                findings.retain(|finding| !is_statutory_payment_twin(finding));
            }
            findings.push(payment_finding);
        }

        let checker = ClauseChecker::new(self.library);
        let missing_required = checker.check_required(text);
        let missing_recommended = checker.check_recommended(text);

        findings.extend(missing_required.iter().map(|clause| absence_finding(clause)));
        findings.extend(missing_recommended.iter().map(|clause| absence_finding(clause)));

        findings.sort_by_key(|finding| Reverse(finding.risk_level));
        let stats = RiskStats::tally(&findings);

        RuleCheckResult {
            findings,
            stats,
            payment,
            missing_required: missing_required
                .iter()
                .map(|clause| clause.topic.clone())
                .collect(),
            missing_recommended: missing_recommended
                .iter()
                .map(|clause| clause.topic.clone())
                .collect(),
        }
    }
}

fn is_statutory_payment_twin(finding: &Finding) -> bool {
    finding.category == RiskCategory::Payment
        && finding
            .legal_references
            .iter()
            .any(|reference| reference == PAYMENT_TERM_REFERENCE)
}

/// The assessment surfaces as a finding when the ceiling is exceeded or the
/// judgement is uncertain enough to warrant attention. A compliant explicit
/// term stays out of the finding list.
fn payment_finding(assessment: &PaymentTermAssessment) -> Option<Finding> {
    if !assessment.violates_60_day_rule && assessment.risk_level < RiskLevel::Medium {
        return None;
    }

    let title = if assessment.violates_60_day_rule {
        "支払期日が法定上限（納品から60日）を超過するおそれ".to_string()
    } else {
        "支払期日の確認が必要".to_string()
    };

    let remedy = Remedy {
        revised_text: "委託料は、納品物の受領日から起算して60日以内に支払うものとする。"
            .to_string(),
        negotiation_soft: Some(
            "フリーランス法で支払期日は納品から60日以内と定められているため、支払条件の見直しをお願いできますでしょうか。"
                .to_string(),
        ),
        negotiation_firm: None,
        legal_basis: Some(PAYMENT_TERM_REFERENCE.to_string()),
    };

    Some(Finding {
        id: PAYMENT_TERM_FINDING_ID.to_string(),
        source: FindingSource::Rule,
        category: RiskCategory::Payment,
        risk_level: assessment.risk_level,
        title,
        explanation: assessment.explanation.clone(),
        evidence_text: assessment.matched_text.clone(),
        legal_references: vec![PAYMENT_TERM_REFERENCE.to_string()],
        remedy: Some(remedy),
    })
}
