//! Presence checks for required and recommended contract topics.

use super::catalog::{ClauseRequirement, PatternLibrary};
use super::domain::{Finding, FindingSource};

/// Checks the contract text against the clause-requirement catalogs. A topic
/// counts as present when any of its detection rules matches anywhere in the
/// text; everything else is reported absent. Empty input therefore reports
/// every defined topic as absent.
#[derive(Clone, Copy)]
pub struct ClauseChecker {
    library: &'static PatternLibrary,
}

impl ClauseChecker {
    pub fn new(library: &'static PatternLibrary) -> Self {
        Self { library }
    }

    /// Required topics the text does not cover, in catalog order.
    pub fn check_required(&self, text: &str) -> Vec<&'static ClauseRequirement> {
        absent(self.library.required_clauses(), text)
    }

    /// Recommended topics the text does not cover, in catalog order.
    pub fn check_recommended(&self, text: &str) -> Vec<&'static ClauseRequirement> {
        absent(self.library.recommended_clauses(), text)
    }
}

fn absent<'a>(clauses: &'a [ClauseRequirement], text: &str) -> Vec<&'a ClauseRequirement> {
    clauses
        .iter()
        .filter(|clause| !clause.is_present(text))
        .collect()
}

/// Turns an absent topic into a finding at its configured absence severity.
pub fn absence_finding(clause: &ClauseRequirement) -> Finding {
    Finding {
        id: clause.id.clone(),
        source: FindingSource::Rule,
        category: clause.category,
        risk_level: clause.absence_risk_level,
        title: format!("{}に関する条項が見当たりません", clause.topic),
        explanation: format!("{} {}", clause.absence_message, clause.rationale),
        evidence_text: None,
        legal_references: clause.legal_reference.iter().cloned().collect(),
        remedy: clause.suggested_fix.as_ref().map(|fix| super::domain::Remedy {
            revised_text: fix.clone(),
            negotiation_soft: None,
            negotiation_firm: None,
            legal_basis: clause.legal_reference.clone(),
        }),
    }
}
