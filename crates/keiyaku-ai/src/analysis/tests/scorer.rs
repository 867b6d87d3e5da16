use crate::analysis::domain::{
    Finding, FindingSource, Grade, RiskCategory, RiskLevel, RiskStats, RuleCheckResult,
};
use crate::analysis::payment::{assess, PaymentTermAssessment};
use crate::analysis::scorer::score;

fn neutral_payment() -> PaymentTermAssessment {
    assess("")
}

fn finding(level: RiskLevel) -> Finding {
    Finding {
        id: format!("test-{level:?}"),
        source: FindingSource::Rule,
        category: RiskCategory::Other,
        risk_level: level,
        title: "テスト指摘".to_string(),
        explanation: "テスト用の指摘です。".to_string(),
        evidence_text: None,
        legal_references: Vec::new(),
        remedy: None,
    }
}

fn result_with(levels: &[RiskLevel]) -> RuleCheckResult {
    let findings: Vec<Finding> = levels.iter().map(|level| finding(*level)).collect();
    let stats = RiskStats::tally(&findings);
    RuleCheckResult {
        findings,
        stats,
        payment: neutral_payment(),
        missing_required: Vec::new(),
        missing_recommended: Vec::new(),
    }
}

#[test]
fn perfect_result_scores_100_grade_a() {
    let scored = score(&result_with(&[]));
    assert_eq!(scored.score, 100);
    assert_eq!(scored.grade, Grade::A);
}

#[test]
fn penalties_are_fixed_per_level() {
    use RiskLevel::*;
    let scored = score(&result_with(&[Critical, High, Medium, Low]));
    // 100 - 25 - 15 - 8 - 3
    assert_eq!(scored.score, 49);
    assert_eq!(scored.grade, Grade::D);
}

#[test]
fn score_clamps_at_zero() {
    let levels = [RiskLevel::Critical; 5];
    let scored = score(&result_with(&levels));
    assert_eq!(scored.score, 0);
    assert_eq!(scored.grade, Grade::F);
}

#[test]
fn grade_band_edges() {
    use RiskLevel::*;
    // 100 - 15 = 85 → A boundary.
    assert_eq!(score(&result_with(&[High])).grade, Grade::A);
    // 100 - 25 - 3 = 72 → B.
    assert_eq!(score(&result_with(&[Critical, Low])).grade, Grade::B);
    // 100 - 25 - 15 = 60 → C.
    assert_eq!(score(&result_with(&[Critical, High])).grade, Grade::C);
    // 100 - 25 - 25 = 50 → D.
    assert_eq!(score(&result_with(&[Critical, Critical])).grade, Grade::D);
    // 100 - 25*3 = 25 → F.
    assert_eq!(
        score(&result_with(&[Critical, Critical, Critical])).grade,
        Grade::F
    );
}

#[test]
fn adding_a_critical_finding_never_raises_the_score() {
    use RiskLevel::*;
    let baselines: [&[RiskLevel]; 4] = [
        &[],
        &[Low, Low],
        &[High, Medium],
        &[Critical, Critical, High],
    ];
    for levels in baselines {
        let before = score(&result_with(levels)).score;
        let mut extended = levels.to_vec();
        extended.push(Critical);
        let after = score(&result_with(&extended)).score;
        assert!(after <= before, "score rose from {before} to {after}");
    }
}

#[test]
fn commentary_flags_critical_findings() {
    let with_critical = score(&result_with(&[RiskLevel::Critical]));
    assert!(with_critical.commentary.contains("重大"));

    let without = score(&result_with(&[RiskLevel::Low]));
    assert!(!without.commentary.contains("重大"));
}

#[test]
fn breakdown_mirrors_the_input_stats() {
    use RiskLevel::*;
    let result = result_with(&[Critical, High, High, Low]);
    let scored = score(&result);
    assert_eq!(scored.breakdown, result.stats);
}

#[test]
fn scoring_is_reproducible() {
    let result = result_with(&[RiskLevel::Critical, RiskLevel::Medium]);
    assert_eq!(score(&result), score(&result));
}
