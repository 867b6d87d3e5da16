//! Statutory payment-term evaluation.
//!
//! The freelance protection act caps the interval between delivery and
//! payment at sixty days. This module extracts the payment term from the
//! contract text with an ordered list of strategies and judges it against
//! that ceiling, independently of the generic pattern matcher. The first
//! strategy that matches wins; later strategies are not attempted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::RiskLevel;

/// Statutory ceiling on the delivery-to-payment interval, in days.
pub const PAYMENT_TERM_CEILING_DAYS: u32 = 60;

/// Days added to an N-days-after-acceptance term for the inspection window
/// that precedes acceptance.
pub const ACCEPTANCE_OFFSET_DAYS: u32 = 10;

/// Averaged-case estimate for an end-of-following-month payment term.
const END_OF_NEXT_MONTH_DAYS: u32 = 45;

/// Estimate for an end-of-month-after-next term. Always over the ceiling.
const END_OF_MONTH_AFTER_NEXT_DAYS: u32 = 75;

/// Legal reference attached to every payment-term finding. The static
/// catalog twin of this rule carries the same string, which is the dedup key
/// keeping one clause from being counted twice.
pub const PAYMENT_TERM_REFERENCE: &str = "フリーランス法第4条第1項";

static DAYS_AFTER_DELIVERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new("(納品|納入)[^。0-9]{0,12}([0-9]{1,3})日以内").expect("delivery-term regex compiles")
});

static DAYS_AFTER_ACCEPTANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("(検収|受入)[^。0-9]{0,12}([0-9]{1,3})日以内")
        .expect("acceptance-term regex compiles")
});

static BARE_DAYS: Lazy<Regex> =
    Lazy::new(|| Regex::new("([0-9]{1,3})日以内").expect("bare-days regex compiles"));

/// Which extraction strategy resolved the payment term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTermBasis {
    DaysAfterDelivery,
    DaysAfterAcceptance,
    EndOfNextMonth,
    EndOfMonthAfterNext,
    DaysNearPaymentTerms,
    Undetermined,
}

/// Structured outcome of the payment-term evaluation. Always produced;
/// [`PaymentTermBasis::Undetermined`] stands in when no strategy matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTermAssessment {
    pub basis: PaymentTermBasis,
    /// Clause text the winning strategy matched, digits normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
    /// Computed or estimated delivery-to-payment interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<u32>,
    pub violates_60_day_rule: bool,
    pub risk_level: RiskLevel,
    pub explanation: String,
}

/// Evaluates the contract's payment term against the statutory ceiling.
pub fn assess(text: &str) -> PaymentTermAssessment {
    let normalized = normalize_digits(text);

    if let Some(found) = DAYS_AFTER_DELIVERY.captures(&normalized) {
        let days = parse_days(&found[2]);
        return judge_explicit(
            PaymentTermBasis::DaysAfterDelivery,
            found[0].to_string(),
            days,
            format!("納品から{days}日以内の支払条件を検出しました。"),
        );
    }

    if let Some(found) = DAYS_AFTER_ACCEPTANCE.captures(&normalized) {
        let days = parse_days(&found[2]);
        let estimated = days.saturating_add(ACCEPTANCE_OFFSET_DAYS);
        let (violates, risk_level) = if days > PAYMENT_TERM_CEILING_DAYS {
            (true, RiskLevel::Critical)
        } else if estimated > PAYMENT_TERM_CEILING_DAYS {
            // Over the ceiling only once the inspection window is added in,
            // so the judgement is an estimate, not a certainty.
            (true, RiskLevel::High)
        } else {
            (false, RiskLevel::Low)
        };
        return PaymentTermAssessment {
            basis: PaymentTermBasis::DaysAfterAcceptance,
            matched_text: Some(found[0].to_string()),
            estimated_days: Some(estimated),
            violates_60_day_rule: violates,
            risk_level,
            explanation: format!(
                "検収から{days}日以内の支払条件を検出しました。検収期間を{ACCEPTANCE_OFFSET_DAYS}日と見込むと、納品から支払まで推定{estimated}日です。"
            ),
        };
    }

    if normalized.contains("翌月末") {
        return PaymentTermAssessment {
            basis: PaymentTermBasis::EndOfNextMonth,
            matched_text: Some("翌月末".to_string()),
            estimated_days: Some(END_OF_NEXT_MONTH_DAYS),
            violates_60_day_rule: false,
            risk_level: RiskLevel::Medium,
            explanation: format!(
                "翌月末払いの支払条件を検出しました。納品日によっては平均{END_OF_NEXT_MONTH_DAYS}日程度となり、締め日次第で上限{PAYMENT_TERM_CEILING_DAYS}日に近づきます。"
            ),
        };
    }

    if normalized.contains("翌々月末") {
        return PaymentTermAssessment {
            basis: PaymentTermBasis::EndOfMonthAfterNext,
            matched_text: Some("翌々月末".to_string()),
            estimated_days: Some(END_OF_MONTH_AFTER_NEXT_DAYS),
            violates_60_day_rule: true,
            risk_level: RiskLevel::Critical,
            explanation: format!(
                "翌々月末払いの支払条件を検出しました。納品から支払まで{END_OF_MONTH_AFTER_NEXT_DAYS}日前後となり、上限{PAYMENT_TERM_CEILING_DAYS}日を確実に超過します。"
            ),
        };
    }

    for sentence in normalized.split('。') {
        if !is_payment_sentence(sentence) {
            continue;
        }
        if let Some(found) = BARE_DAYS.captures(sentence) {
            let days = parse_days(&found[1]);
            return judge_explicit(
                PaymentTermBasis::DaysNearPaymentTerms,
                found[0].to_string(),
                days,
                format!("支払条項の近傍で{days}日以内の期限を検出しました。"),
            );
        }
    }

    PaymentTermAssessment {
        basis: PaymentTermBasis::Undetermined,
        matched_text: None,
        estimated_days: None,
        violates_60_day_rule: false,
        risk_level: RiskLevel::Medium,
        explanation: "支払期日を特定できませんでした。支払期日は納品から60日以内で明記することを推奨します。".to_string(),
    }
}

fn judge_explicit(
    basis: PaymentTermBasis,
    matched_text: String,
    days: u32,
    detected: String,
) -> PaymentTermAssessment {
    let violates = days > PAYMENT_TERM_CEILING_DAYS;
    let (risk_level, verdict) = if violates {
        (
            RiskLevel::Critical,
            format!("上限{PAYMENT_TERM_CEILING_DAYS}日を超過しています。"),
        )
    } else {
        (
            RiskLevel::Low,
            format!("上限{PAYMENT_TERM_CEILING_DAYS}日の範囲内です。"),
        )
    };
    PaymentTermAssessment {
        basis,
        matched_text: Some(matched_text),
        estimated_days: Some(days),
        violates_60_day_rule: violates,
        risk_level,
        explanation: format!("{detected}{verdict}"),
    }
}

fn is_payment_sentence(sentence: &str) -> bool {
    ["支払", "代金", "報酬", "委託料"]
        .iter()
        .any(|word| sentence.contains(word))
}

fn parse_days(digits: &str) -> u32 {
    // The capture group admits at most three ASCII digits.
    digits.parse().unwrap_or(u32::MAX)
}

/// Maps full-width digits (０-９) to ASCII so one set of regexes covers both
/// writings.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '０'..='９' => {
                let offset = ch as u32 - '０' as u32;
                char::from(b'0' + offset as u8)
            }
            other => other,
        })
        .collect()
}
