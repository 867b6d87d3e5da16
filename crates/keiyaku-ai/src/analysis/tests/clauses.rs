use super::common::*;
use crate::analysis::catalog::PatternLibrary;
use crate::analysis::clauses::{absence_finding, ClauseChecker};
use crate::analysis::domain::FindingSource;

fn checker() -> ClauseChecker {
    ClauseChecker::new(PatternLibrary::standard())
}

#[test]
fn empty_text_reports_every_required_topic_absent() {
    let absent = checker().check_required("");
    assert_eq!(absent.len(), PatternLibrary::standard().required_clauses().len());
}

#[test]
fn empty_text_reports_every_recommended_topic_absent() {
    let absent = checker().check_recommended("");
    assert_eq!(
        absent.len(),
        PatternLibrary::standard().recommended_clauses().len()
    );
}

#[test]
fn clean_contract_covers_every_topic() {
    assert!(checker().check_required(CLEAN_CONTRACT).is_empty());
    assert!(checker().check_recommended(CLEAN_CONTRACT).is_empty());
}

#[test]
fn any_single_rule_counts_as_presence() {
    // Only the 機密情報 writing of the confidentiality topic appears.
    let text = "乙は、甲の機密情報を第三者に開示してはならない。";
    let absent = checker().check_recommended(text);
    assert!(!absent.iter().any(|c| c.id == "recommended-confidentiality"));
}

#[test]
fn absent_topics_keep_catalog_order() {
    let absent = checker().check_required("");
    let expected: Vec<&str> = PatternLibrary::standard()
        .required_clauses()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    let actual: Vec<&str> = absent.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn absence_finding_carries_the_configured_severity() {
    let library = PatternLibrary::standard();
    let clause = library
        .required_clauses()
        .iter()
        .find(|c| c.id == "required-payment-deadline")
        .expect("payment deadline requirement exists");

    let finding = absence_finding(clause);
    assert_eq!(finding.source, FindingSource::Rule);
    assert_eq!(finding.risk_level, clause.absence_risk_level);
    assert!(finding.title.contains(&clause.topic));
    assert!(finding.explanation.contains(&clause.absence_message));
}
