use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::analysis::domain::{Remedy, RiskCategory, RiskLevel};
use crate::analysis::model::{ContractAnalyzer, ModelAnalysis, ModelFinding};
use crate::analysis::service::AnalysisService;
use crate::error::AnalysisError;

/// Compliant fixture: every required and recommended topic covered, capped
/// liability, payment within the statutory ceiling.
pub(super) const CLEAN_CONTRACT: &str = "\
業務委託契約書\n\
第1条（業務内容） 甲が乙に委託する業務の内容は、別紙の業務仕様書に定めるとおりとする。業務内容の変更は、甲乙の書面による合意により行う。\n\
第2条（委託料） 本件業務の委託料は金300,000円（消費税別）とする。\n\
第3条（支払期日） 甲は、委託料を納品後30日以内に乙の指定する口座に振り込む方法により支払う。\n\
第4条（納期） 乙は、納品物を甲乙が別途合意する納期までに納入する。\n\
第5条（検収） 甲は、納品後10営業日以内に検収を行い、期間内に通知がない場合は検収に合格したものとみなす。\n\
第6条（知的財産権） 納品物の著作権は、委託料の完済をもって乙から甲に移転する。\n\
第7条（損害賠償） 甲または乙は、相手方に生じた通常かつ直接の損害を賠償する。損害賠償額は、本契約の委託料相当額を上限とする。\n\
第8条（秘密保持） 甲および乙は、相手方の秘密情報を第三者に開示してはならない。\n\
第9条（再委託） 乙は、甲の事前の書面による承諾を得た場合に限り、本件業務の一部を再委託できる。\n\
第10条（契約解除） 甲および乙は、相手方に重大な違反があるときは本契約を解除できる。\n\
第11条（反社会的勢力の排除） 甲および乙は、自らが反社会的勢力に該当しないことを表明し保証する。\n\
第12条（生成AIの利用） 乙が本件業務に生成AIを利用する場合の条件は、別紙に定める。\n\
第13条（協議） 本契約に定めのない事項は、甲乙誠実に協議のうえ解決する。\n\
第14条（管轄） 本契約に関する紛争は、東京地方裁判所を第一審の合意管轄裁判所とする。\n";

/// Hostile fixture: statutory payment violation, unlimited liability,
/// direction-and-control wording, moral-rights waiver.
pub(super) const RISKY_CONTRACT: &str = "\
乙は、業務の遂行にあたり甲の指揮命令に従うものとする。\n\
委託料は、納品後90日以内に支払うものとする。\n\
乙は、甲に生じた一切の損害を賠償しなければならない。\n\
乙は、納品物に関する著作者人格権を行使しないものとする。\n";

pub(super) fn model_finding(
    category: RiskCategory,
    risk_level: RiskLevel,
    title: &str,
    references: &[&str],
) -> ModelFinding {
    ModelFinding {
        category,
        risk_level,
        title: title.to_string(),
        excerpt: None,
        explanation: format!("{title}に関するモデル側の指摘です。"),
        references: references.iter().map(|r| r.to_string()).collect(),
        remedy: None,
    }
}

pub(super) fn long_remedy(text: &str) -> Remedy {
    Remedy {
        revised_text: text.to_string(),
        negotiation_soft: Some("修正をご相談させてください。".to_string()),
        negotiation_firm: None,
        legal_basis: None,
    }
}

pub(super) fn model_analysis(findings: Vec<ModelFinding>) -> ModelAnalysis {
    ModelAnalysis {
        summary: "全体として受託者側にやや不利な内容です。".to_string(),
        contract_type: "業務委託契約（請負）".to_string(),
        findings,
        missing_clauses: Vec::new(),
    }
}

/// Test double returning a canned analysis.
pub(super) struct MockAnalyzer {
    pub analysis: ModelAnalysis,
}

#[async_trait]
impl ContractAnalyzer for MockAnalyzer {
    async fn analyze(
        &self,
        _text: &str,
        _context: Option<&str>,
    ) -> Result<ModelAnalysis, AnalysisError> {
        Ok(self.analysis.clone())
    }
}

/// Test double failing with a fixed error.
pub(super) struct FailingAnalyzer;

#[async_trait]
impl ContractAnalyzer for FailingAnalyzer {
    async fn analyze(
        &self,
        _text: &str,
        _context: Option<&str>,
    ) -> Result<ModelAnalysis, AnalysisError> {
        Err(AnalysisError::CollaboratorUnavailable(
            "connection refused".to_string(),
        ))
    }
}

/// Test double that never answers within the service timeout.
pub(super) struct StallingAnalyzer;

#[async_trait]
impl ContractAnalyzer for StallingAnalyzer {
    async fn analyze(
        &self,
        _text: &str,
        _context: Option<&str>,
    ) -> Result<ModelAnalysis, AnalysisError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("stalling analyzer should always be timed out")
    }
}

pub(super) fn service_with(analyzer: impl ContractAnalyzer + 'static) -> AnalysisService {
    AnalysisService::new(Arc::new(analyzer), Duration::from_millis(200))
}
