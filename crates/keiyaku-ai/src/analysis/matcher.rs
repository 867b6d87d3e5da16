//! Scans contract text against the danger-pattern catalog.

use super::catalog::{Pattern, PatternLibrary};
use super::domain::{Finding, FindingSource, Remedy};

/// Stateless scanner over a shared, immutable pattern library. Safe to use
/// from any thread; every scan allocates only its own output.
#[derive(Clone, Copy)]
pub struct PatternMatcher {
    library: &'static PatternLibrary,
}

impl PatternMatcher {
    pub fn new(library: &'static PatternLibrary) -> Self {
        Self { library }
    }

    /// Tests every pattern in catalog order. A pattern contributes at most
    /// one finding per scan: the first rule that matches wins and the
    /// remaining rules for that pattern are skipped.
    pub fn scan(&self, text: &str) -> Vec<Finding> {
        self.library
            .patterns()
            .iter()
            .filter_map(|pattern| {
                pattern
                    .rules
                    .iter()
                    .find_map(|rule| rule.first_match(text))
                    .map(|evidence| build_finding(pattern, evidence))
            })
            .collect()
    }
}

fn build_finding(pattern: &Pattern, evidence: &str) -> Finding {
    let explanation = pattern.explanation.replace("{matched}", evidence);
    let remedy = pattern.suggested_fix.as_ref().map(|fix| Remedy {
        revised_text: fix.clone(),
        negotiation_soft: pattern.negotiation_script.clone(),
        negotiation_firm: None,
        legal_basis: pattern.legal_reference.clone(),
    });

    Finding {
        id: pattern.id.clone(),
        source: FindingSource::Rule,
        category: pattern.category,
        risk_level: pattern.risk_level,
        title: pattern.title.clone(),
        explanation,
        evidence_text: Some(evidence.to_string()),
        legal_references: pattern.legal_reference.iter().cloned().collect(),
        remedy,
    }
}
