//! Reproducible scoring over the rule-based result.
//!
//! The score reads nothing but the aggregate severity counts of the
//! deterministic side. Model-based findings never feed into it, so the same
//! document always grades identically regardless of what the external
//! analyzer returned. Integer arithmetic only.

use super::domain::{DeterministicScore, Grade, RuleCheckResult};

pub const CRITICAL_PENALTY: u32 = 25;
pub const HIGH_PENALTY: u32 = 15;
pub const MEDIUM_PENALTY: u32 = 8;
pub const LOW_PENALTY: u32 = 3;

/// Computes the 0-100 score, letter grade, and commentary for a rule result.
pub fn score(result: &RuleCheckResult) -> DeterministicScore {
    let stats = result.stats;
    let penalty = stats.critical * CRITICAL_PENALTY
        + stats.high * HIGH_PENALTY
        + stats.medium * MEDIUM_PENALTY
        + stats.low * LOW_PENALTY;
    let score = 100u32.saturating_sub(penalty).min(100) as u8;

    let grade = grade_for(score);
    let commentary = commentary_for(grade, stats.critical > 0).to_string();

    DeterministicScore {
        score,
        grade,
        breakdown: stats,
        commentary,
    }
}

fn grade_for(score: u8) -> Grade {
    match score {
        85..=100 => Grade::A,
        70..=84 => Grade::B,
        55..=69 => Grade::C,
        40..=54 => Grade::D,
        _ => Grade::F,
    }
}

fn commentary_for(grade: Grade, has_critical: bool) -> &'static str {
    if has_critical {
        return match grade {
            Grade::A | Grade::B => {
                "全体としては良好ですが、重大なリスク条項が含まれています。該当箇所は締結前に必ず修正してください。"
            }
            Grade::C | Grade::D => {
                "重大なリスク条項が含まれています。修正提案をもとに相手方と交渉することを強く推奨します。"
            }
            Grade::F => {
                "重大なリスク条項が複数含まれており、このままの締結は推奨できません。条項の修正交渉が必要です。"
            }
        };
    }

    match grade {
        Grade::A => "大きな問題は見つかりませんでした。安心して締結できる水準です。",
        Grade::B => "おおむね良好です。指摘された箇所を確認のうえ締結してください。",
        Grade::C => "注意すべき条項があります。修正提案を参考に見直しを検討してください。",
        Grade::D => "リスクの高い条項が複数あります。締結前に修正交渉を推奨します。",
        Grade::F => "多くのリスク条項が検出されました。全体的な見直しが必要です。",
    }
}
