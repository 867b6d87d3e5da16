//! Reconciles the deterministic rule result with the model-based analysis.
//!
//! Matching is an explicit, test-covered similarity function: findings that
//! share a legal reference are the same issue outright; otherwise two
//! findings in the same category merge when their normalized titles contain
//! one another or their character-bigram Jaccard similarity reaches
//! [`TITLE_SIMILARITY_THRESHOLD`]. Differently-worded near-duplicates below
//! the threshold stay visible as two findings rather than being guessed
//! together.

use std::cmp::Reverse;
use std::collections::HashSet;

use super::domain::{Finding, FindingSource, MergedResult, RiskStats, RuleCheckResult};
use super::model::{ModelAnalysis, ModelFinding};
use super::scorer;

/// Minimum character-bigram Jaccard similarity for two titles in the same
/// category to count as the same issue.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.45;

/// A model remedy replaces the rule remedy only when its revised text
/// reaches this many characters; trivial stubs fall back to the rule side.
pub const MODEL_REMEDY_MIN_CHARS: usize = 20;

/// Merges both analysis halves into the final report. The deterministic
/// score is computed here from the rule result alone, before any model
/// finding is touched.
pub fn merge(rule_result: RuleCheckResult, model: ModelAnalysis) -> MergedResult {
    let deterministic_score = scorer::score(&rule_result);

    let model_findings: Vec<Finding> = model
        .findings
        .iter()
        .enumerate()
        .map(|(index, finding)| from_model(finding, index))
        .collect();
    let mut claimed = vec![false; model_findings.len()];

    let mut merged_both = Vec::new();
    let mut rule_only = Vec::new();

    for rule_finding in rule_result.findings.iter() {
        let matched = model_findings
            .iter()
            .enumerate()
            .find(|(index, candidate)| !claimed[*index] && same_issue(rule_finding, candidate));

        match matched {
            Some((index, model_finding)) => {
                claimed[index] = true;
                merged_both.push(combine(rule_finding, model_finding));
            }
            None => rule_only.push(rule_finding.clone()),
        }
    }

    let model_only = model_findings
        .into_iter()
        .zip(claimed)
        .filter_map(|(finding, was_claimed)| (!was_claimed).then_some(finding));

    let mut findings: Vec<Finding> = merged_both
        .into_iter()
        .chain(rule_only)
        .chain(model_only)
        .collect();
    findings.sort_by_key(|finding| Reverse(finding.risk_level));

    let missing_clauses = union_missing_clauses(&rule_result, &model.missing_clauses);
    let stats = RiskStats::tally(&findings);

    MergedResult {
        summary: model.summary,
        classification: model.contract_type,
        findings,
        missing_clauses,
        stats,
        deterministic_score,
    }
}

fn from_model(finding: &ModelFinding, index: usize) -> Finding {
    Finding {
        id: format!("model-{}", index + 1),
        source: FindingSource::Model,
        category: finding.category,
        risk_level: finding.risk_level,
        title: finding.title.clone(),
        explanation: finding.explanation.clone(),
        evidence_text: finding.excerpt.clone(),
        legal_references: finding.references.clone(),
        remedy: finding.remedy.clone(),
    }
}

/// Explicit equivalence judgement between one rule finding and one model
/// finding.
pub fn same_issue(rule: &Finding, model: &Finding) -> bool {
    if references_overlap(&rule.legal_references, &model.legal_references) {
        return true;
    }
    rule.category == model.category && titles_similar(&rule.title, &model.title)
}

fn combine(rule: &Finding, model: &Finding) -> Finding {
    let remedy = match &model.remedy {
        Some(remedy) if remedy.revised_text.chars().count() >= MODEL_REMEDY_MIN_CHARS => {
            Some(remedy.clone())
        }
        _ => rule.remedy.clone().or_else(|| model.remedy.clone()),
    };

    let mut legal_references = rule.legal_references.clone();
    let mut seen: HashSet<String> = legal_references.iter().map(|r| normalize(r)).collect();
    for reference in &model.legal_references {
        if seen.insert(normalize(reference)) {
            legal_references.push(reference.clone());
        }
    }

    Finding {
        id: rule.id.clone(),
        source: FindingSource::Both,
        category: rule.category,
        // Stricter severity wins.
        risk_level: rule.risk_level.max(model.risk_level),
        title: rule.title.clone(),
        explanation: format!("{}\n{}", rule.explanation, model.explanation),
        evidence_text: rule.evidence_text.clone().or_else(|| model.evidence_text.clone()),
        legal_references,
        remedy,
    }
}

fn union_missing_clauses(rule_result: &RuleCheckResult, model_missing: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    rule_result
        .missing_required
        .iter()
        .chain(rule_result.missing_recommended.iter())
        .chain(model_missing.iter())
        .filter(|label| seen.insert((*label).clone()))
        .cloned()
        .collect()
}

fn references_overlap(left: &[String], right: &[String]) -> bool {
    left.iter()
        .any(|a| right.iter().any(|b| normalize(a) == normalize(b)))
}

/// Case-folds and strips all whitespace, including full-width spaces.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn titles_similar(left: &str, right: &str) -> bool {
    let left = normalize(left);
    let right = normalize(right);
    if left.is_empty() || right.is_empty() {
        return false;
    }
    if left.contains(&right) || right.contains(&left) {
        return true;
    }
    bigram_jaccard(&left, &right) >= TITLE_SIMILARITY_THRESHOLD
}

fn bigrams(text: &str) -> HashSet<(char, char)> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

fn bigram_jaccard(left: &str, right: &str) -> f64 {
    let left = bigrams(left);
    let right = bigrams(right);
    if left.is_empty() && right.is_empty() {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}
