//! Embedded, versioned catalogs of danger patterns, clause requirements, and
//! known-bad exemplar clauses.
//!
//! The catalogs are data, not code: JSON documents compiled into the binary
//! and deserialized once into a [`PatternLibrary`]. Detection logic lives in
//! the generic evaluator ([`DetectionRule`]); adding or tuning a pattern is a
//! catalog edit, not a code change. A malformed catalog is a defect, so
//! loading panics with a pointed message and a conformance test exercises the
//! full load.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::domain::{RiskCategory, RiskLevel};

const DANGER_PATTERNS: &str = include_str!("data/danger_patterns.json");
const REQUIRED_CLAUSES: &str = include_str!("data/required_clauses.json");
const RECOMMENDED_CLAUSES: &str = include_str!("data/recommended_clauses.json");
const KNOWN_BAD_PATTERNS: &str = include_str!("data/known_bad_patterns.json");

static STANDARD: Lazy<PatternLibrary> = Lazy::new(PatternLibrary::load_embedded);

/// One textual detection rule. A compiled regex or a literal substring; a
/// pattern matches when ANY of its rules match.
#[derive(Debug)]
pub enum DetectionRule {
    Contains(String),
    Regex(Regex),
}

impl DetectionRule {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            DetectionRule::Contains(needle) => text.contains(needle.as_str()),
            DetectionRule::Regex(regex) => regex.is_match(text),
        }
    }

    /// First matched substring, used verbatim as finding evidence.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        match self {
            DetectionRule::Contains(needle) => text
                .find(needle.as_str())
                .map(|start| &text[start..start + needle.len()]),
            DetectionRule::Regex(regex) => regex.find(text).map(|found| found.as_str()),
        }
    }
}

/// A danger pattern: detection rules plus the risk metadata reported when
/// any rule matches. Immutable after load.
#[derive(Debug)]
pub struct Pattern {
    pub id: String,
    pub category: RiskCategory,
    pub risk_level: RiskLevel,
    pub title: String,
    /// May contain `{matched}`, replaced with the evidence excerpt.
    pub explanation: String,
    pub legal_reference: Option<String>,
    pub suggested_fix: Option<String>,
    pub negotiation_script: Option<String>,
    pub rules: Vec<DetectionRule>,
}

/// A topic the contract should cover. Presence is satisfied by ANY rule
/// matching; absence is reported at `absence_risk_level`.
#[derive(Debug)]
pub struct ClauseRequirement {
    pub id: String,
    pub topic: String,
    pub category: RiskCategory,
    pub absence_risk_level: RiskLevel,
    pub absence_message: String,
    pub rationale: String,
    pub legal_reference: Option<String>,
    pub suggested_fix: Option<String>,
    pub rules: Vec<DetectionRule>,
}

impl ClauseRequirement {
    pub fn is_present(&self, text: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(text))
    }
}

/// Curated known-bad exemplar clause, fed to the model-based analyzer's
/// prompt so it recognizes the classics.
#[derive(Debug, Clone, Deserialize)]
pub struct KnownBadEntry {
    pub id: String,
    pub category: RiskCategory,
    pub clause: String,
    pub commentary: String,
}

/// The full compiled catalog set. Read-only and shared by reference across
/// concurrent analyses.
#[derive(Debug)]
pub struct PatternLibrary {
    version: String,
    patterns: Vec<Pattern>,
    required: Vec<ClauseRequirement>,
    recommended: Vec<ClauseRequirement>,
    known_bad: Vec<KnownBadEntry>,
}

impl PatternLibrary {
    /// The embedded catalogs, compiled once per process.
    pub fn standard() -> &'static PatternLibrary {
        &STANDARD
    }

    fn load_embedded() -> Self {
        let danger: DangerCatalogSpec =
            serde_json::from_str(DANGER_PATTERNS).expect("danger pattern catalog is valid JSON");
        let required: ClauseCatalogSpec =
            serde_json::from_str(REQUIRED_CLAUSES).expect("required clause catalog is valid JSON");
        let recommended: ClauseCatalogSpec = serde_json::from_str(RECOMMENDED_CLAUSES)
            .expect("recommended clause catalog is valid JSON");
        let known_bad: KnownBadCatalogSpec = serde_json::from_str(KNOWN_BAD_PATTERNS)
            .expect("known-bad catalog is valid JSON");

        for (name, version) in [
            ("required clause", &required.catalog_version),
            ("recommended clause", &recommended.catalog_version),
            ("known-bad", &known_bad.catalog_version),
        ] {
            assert_eq!(
                version, &danger.catalog_version,
                "{name} catalog version drifted from the danger pattern catalog"
            );
        }

        let library = Self {
            version: danger.catalog_version,
            patterns: danger.patterns.into_iter().map(PatternSpec::compile).collect(),
            required: required.clauses.into_iter().map(ClauseSpec::compile).collect(),
            recommended: recommended
                .clauses
                .into_iter()
                .map(ClauseSpec::compile)
                .collect(),
            known_bad: known_bad.entries,
        };
        library.assert_unique_ids();
        library
    }

    fn assert_unique_ids(&self) {
        let mut seen = HashSet::new();
        let ids = self
            .patterns
            .iter()
            .map(|pattern| pattern.id.as_str())
            .chain(self.required.iter().map(|clause| clause.id.as_str()))
            .chain(self.recommended.iter().map(|clause| clause.id.as_str()))
            .chain(self.known_bad.iter().map(|entry| entry.id.as_str()));
        for id in ids {
            assert!(seen.insert(id), "duplicate catalog id '{id}'");
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// All danger patterns in catalog order. Scan order is contract-visible:
    /// it fixes tie order among findings of equal severity.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn patterns_by_category(
        &self,
        category: RiskCategory,
    ) -> impl Iterator<Item = &Pattern> {
        self.patterns
            .iter()
            .filter(move |pattern| pattern.category == category)
    }

    pub fn required_clauses(&self) -> &[ClauseRequirement] {
        &self.required
    }

    pub fn recommended_clauses(&self) -> &[ClauseRequirement] {
        &self.recommended
    }

    pub fn known_bad(&self) -> &[KnownBadEntry] {
        &self.known_bad
    }
}

#[derive(Debug, Deserialize)]
struct DangerCatalogSpec {
    catalog_version: String,
    patterns: Vec<PatternSpec>,
}

#[derive(Debug, Deserialize)]
struct ClauseCatalogSpec {
    catalog_version: String,
    clauses: Vec<ClauseSpec>,
}

#[derive(Debug, Deserialize)]
struct KnownBadCatalogSpec {
    catalog_version: String,
    entries: Vec<KnownBadEntry>,
}

#[derive(Debug, Deserialize)]
struct PatternSpec {
    id: String,
    category: RiskCategory,
    risk_level: RiskLevel,
    title: String,
    explanation: String,
    #[serde(default)]
    legal_reference: Option<String>,
    #[serde(default)]
    suggested_fix: Option<String>,
    #[serde(default)]
    negotiation_script: Option<String>,
    rules: Vec<DetectionRuleSpec>,
}

impl PatternSpec {
    fn compile(self) -> Pattern {
        let rules = compile_rules(self.rules, &self.id);
        Pattern {
            id: self.id,
            category: self.category,
            risk_level: self.risk_level,
            title: self.title,
            explanation: self.explanation,
            legal_reference: self.legal_reference,
            suggested_fix: self.suggested_fix,
            negotiation_script: self.negotiation_script,
            rules,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClauseSpec {
    id: String,
    topic: String,
    category: RiskCategory,
    absence_risk_level: RiskLevel,
    absence_message: String,
    rationale: String,
    #[serde(default)]
    legal_reference: Option<String>,
    #[serde(default)]
    suggested_fix: Option<String>,
    rules: Vec<DetectionRuleSpec>,
}

impl ClauseSpec {
    fn compile(self) -> ClauseRequirement {
        let rules = compile_rules(self.rules, &self.id);
        ClauseRequirement {
            id: self.id,
            topic: self.topic,
            category: self.category,
            absence_risk_level: self.absence_risk_level,
            absence_message: self.absence_message,
            rationale: self.rationale,
            legal_reference: self.legal_reference,
            suggested_fix: self.suggested_fix,
            rules,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum DetectionRuleSpec {
    Contains(String),
    Regex(String),
}

fn compile_rules(specs: Vec<DetectionRuleSpec>, owner: &str) -> Vec<DetectionRule> {
    assert!(!specs.is_empty(), "catalog entry '{owner}' has no detection rules");
    specs
        .into_iter()
        .map(|spec| match spec {
            DetectionRuleSpec::Contains(needle) => {
                assert!(
                    !needle.is_empty(),
                    "catalog entry '{owner}' has an empty contains rule"
                );
                DetectionRule::Contains(needle)
            }
            DetectionRuleSpec::Regex(pattern) => DetectionRule::Regex(
                Regex::new(&pattern).unwrap_or_else(|err| {
                    panic!("catalog entry '{owner}' has a malformed regex: {err}")
                }),
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rule_reports_the_matched_substring() {
        let rule = DetectionRule::Contains("翌々月末".to_string());
        assert_eq!(rule.first_match("支払は翌々月末とする。"), Some("翌々月末"));
        assert_eq!(rule.first_match("支払は翌月末とする。"), None);
    }

    #[test]
    fn regex_rule_reports_the_matched_substring() {
        let rule = DetectionRule::Regex(
            Regex::new("一切の損害.{0,15}賠償").expect("test regex compiles"),
        );
        let text = "乙は、甲に生じた一切の損害を賠償しなければならない。";
        assert_eq!(rule.first_match(text), Some("一切の損害を賠償"));
    }
}
