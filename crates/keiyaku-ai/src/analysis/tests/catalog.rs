use std::collections::HashSet;

use crate::analysis::catalog::PatternLibrary;
use crate::analysis::domain::RiskCategory;

#[test]
fn embedded_catalogs_load() {
    let library = PatternLibrary::standard();
    assert!(!library.version().is_empty());
    assert!(!library.patterns().is_empty());
    assert!(!library.required_clauses().is_empty());
    assert!(!library.recommended_clauses().is_empty());
    assert!(!library.known_bad().is_empty());
}

#[test]
fn catalog_ids_are_globally_unique() {
    let library = PatternLibrary::standard();
    let mut seen = HashSet::new();
    let ids = library
        .patterns()
        .iter()
        .map(|pattern| pattern.id.as_str())
        .chain(library.required_clauses().iter().map(|c| c.id.as_str()))
        .chain(library.recommended_clauses().iter().map(|c| c.id.as_str()))
        .chain(library.known_bad().iter().map(|e| e.id.as_str()));
    for id in ids {
        assert!(seen.insert(id), "duplicate catalog id '{id}'");
    }
}

#[test]
fn every_curated_category_has_a_danger_pattern() {
    let library = PatternLibrary::standard();
    for category in RiskCategory::CURATED {
        assert!(
            library.patterns_by_category(category).next().is_some(),
            "no danger pattern for {category:?}"
        );
    }
}

#[test]
fn load_bearing_categories_have_at_least_two_patterns() {
    let library = PatternLibrary::standard();
    for category in [
        RiskCategory::Payment,
        RiskCategory::Liability,
        RiskCategory::ProhibitedActs,
        RiskCategory::Copyright,
        RiskCategory::DisguisedEmployment,
    ] {
        assert!(
            library.patterns_by_category(category).count() >= 2,
            "{category:?} needs at least two patterns"
        );
    }
}

#[test]
fn every_pattern_has_detection_rules() {
    for pattern in PatternLibrary::standard().patterns() {
        assert!(!pattern.rules.is_empty(), "pattern {} has no rules", pattern.id);
    }
}
