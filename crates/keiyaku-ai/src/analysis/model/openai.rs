//! OpenAI-backed implementation of the analyzer boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ContractAnalyzer, ModelAnalysis};
use crate::analysis::catalog::PatternLibrary;
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;

/// Chat-completions client for the model-based analyzer. Holds only
/// stateless configuration; one instance serves concurrent analyses.
pub struct OpenAiAnalyzer {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    library: &'static PatternLibrary,
}

impl OpenAiAnalyzer {
    /// Builds the client, failing fast when the credential is missing. The
    /// rule-only paths never construct this, so they keep working without
    /// one.
    pub fn from_config(
        config: &AnalyzerConfig,
        library: &'static PatternLibrary,
    ) -> Result<Self, AnalysisError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AnalysisError::Configuration("ANALYZER_API_KEY is not set".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            library,
        })
    }
}

#[async_trait]
impl ContractAnalyzer for OpenAiAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<ModelAnalysis, AnalysisError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: 0,
            response_format: ResponseFormat { kind: "json_object" },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: build_system_prompt(self.library),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(text, context),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, chars = text.chars().count(), "requesting model analysis");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| AnalysisError::CollaboratorUnavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::CollaboratorUnavailable(format!(
                "analyzer returned {status}: {body}"
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|err| AnalysisError::CollaboratorResponseInvalid(err.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| {
                AnalysisError::CollaboratorResponseInvalid("completion has no choices".into())
            })?;

        let analysis = parse_analysis(content)?;
        info!(findings = analysis.findings.len(), "model analysis complete");
        Ok(analysis)
    }
}

/// Parses the model payload, unwrapping a Markdown code fence when present.
pub(crate) fn parse_analysis(content: &str) -> Result<ModelAnalysis, AnalysisError> {
    let payload = unwrap_code_fence(content);
    serde_json::from_str(payload)
        .map_err(|err| AnalysisError::CollaboratorResponseInvalid(err.to_string()))
}

pub(crate) fn unwrap_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

pub(crate) fn build_system_prompt(library: &PatternLibrary) -> String {
    let mut prompt = String::from(
        "あなたはフリーランス・業務委託契約を専門とする契約書レビューアシスタントです。\
         契約書本文を分析し、受託者にとってのリスク条項を洗い出してください。\
         回答は次のキーを持つ厳密なJSONのみで返してください: \
         summary（全体講評）, contract_type（契約類型）, findings（配列。各要素は \
         category, risk_level, title, excerpt, explanation, references, \
         remedy{revised_text, negotiation_soft, negotiation_firm, legal_basis}）, \
         missing_clauses（不足条項ラベルの配列）。\
         categoryは payment, liability, prohibited_acts, copyright, \
         disguised_employment, non_compete, scope, conformity, jurisdiction, \
         ai_usage, acceptance のいずれか、risk_levelは critical, high, medium, low \
         のいずれかを使ってください。\n\n既知の危険条項の例:\n",
    );

    for entry in library.known_bad() {
        prompt.push_str("- 「");
        prompt.push_str(&entry.clause);
        prompt.push_str("」: ");
        prompt.push_str(&entry.commentary);
        prompt.push('\n');
    }

    prompt
}

fn build_user_prompt(text: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => {
            format!("依頼者の立場・背景: {context}\n\n以下の契約書を分析してください。\n\n{text}")
        }
        None => format!("以下の契約書を分析してください。\n\n{text}"),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: u8,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
