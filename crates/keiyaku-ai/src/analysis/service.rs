//! Orchestration of the hybrid analysis pipeline.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::domain::{MergedResult, RuleReport};
use super::engine::RuleEngine;
use super::merger;
use super::model::ContractAnalyzer;
use super::scorer;
use crate::error::AnalysisError;

/// Entry point for callers. Owns the rule engine and the injected analyzer
/// handle; both are stateless, so one service serves concurrent requests.
pub struct AnalysisService {
    engine: RuleEngine,
    analyzer: Arc<dyn ContractAnalyzer>,
    analyzer_timeout: Duration,
}

impl AnalysisService {
    pub fn new(analyzer: Arc<dyn ContractAnalyzer>, analyzer_timeout: Duration) -> Self {
        Self {
            engine: RuleEngine::standard(),
            analyzer,
            analyzer_timeout,
        }
    }

    /// Full hybrid analysis. The rule engine and the analyzer call run
    /// concurrently; the merge waits for both. Analyzer failures propagate
    /// as typed errors, never as a silently degraded rule-only result.
    pub async fn analyze(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<MergedResult, AnalysisError> {
        let engine = self.engine;
        let owned_text = text.to_string();
        let rule_task = tokio::task::spawn_blocking(move || engine.run(&owned_text));
        let analyzer_call =
            tokio::time::timeout(self.analyzer_timeout, self.analyzer.analyze(text, context));

        let (rule_result, model_result) = tokio::join!(rule_task, analyzer_call);

        // The rule engine cannot fail for any input; a join error is a panic
        // inside the blocking task and is re-raised as such.
        let rule_result = rule_result.expect("rule engine task panicked");
        let model = match model_result {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(error)) => return Err(error),
            Err(_) => {
                return Err(AnalysisError::CollaboratorUnavailable(format!(
                    "analyzer timed out after {}s",
                    self.analyzer_timeout.as_secs()
                )))
            }
        };

        let merged = merger::merge(rule_result, model);
        info!(
            findings = merged.findings.len(),
            score = merged.deterministic_score.score,
            "hybrid analysis complete"
        );
        Ok(merged)
    }

    /// Rule-only report. Opt-in path for callers that cannot or do not want
    /// to reach the external analyzer; needs no credentials and no network.
    pub fn check(&self, text: &str) -> RuleReport {
        let result = self.engine.run(text);
        let score = scorer::score(&result);
        RuleReport { result, score }
    }
}
