use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use keiyaku_ai::analysis::{
    AnalysisService, ContractAnalyzer, ModelAnalysis, OpenAiAnalyzer, PatternLibrary,
};
use keiyaku_ai::config::AnalyzerConfig;
use keiyaku_ai::error::AnalysisError;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Placeholder analyzer used when no credential is configured. Rule-only
/// routes keep working; the hybrid route fails fast with a typed
/// configuration error at first use.
pub(crate) struct UnconfiguredAnalyzer;

#[axum::async_trait]
impl ContractAnalyzer for UnconfiguredAnalyzer {
    async fn analyze(
        &self,
        _text: &str,
        _context: Option<&str>,
    ) -> Result<ModelAnalysis, AnalysisError> {
        Err(AnalysisError::Configuration(
            "ANALYZER_API_KEY is not set".to_string(),
        ))
    }
}

pub(crate) fn build_analysis_service(config: &AnalyzerConfig) -> AnalysisService {
    let analyzer: Arc<dyn ContractAnalyzer> =
        match OpenAiAnalyzer::from_config(config, PatternLibrary::standard()) {
            Ok(analyzer) => Arc::new(analyzer),
            Err(error) => {
                warn!(%error, "analyzer credential missing; serving rule-only analysis");
                Arc::new(UnconfiguredAnalyzer)
            }
        };

    AnalysisService::new(analyzer, Duration::from_secs(config.timeout_secs))
}
