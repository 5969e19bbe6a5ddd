//! Risk assessment of an extracted contract record.

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::aggregate::{overall_level, summarize};
use super::prompts::{risk_system_prompt, risk_user_prompt};
use crate::config::GenerationSettings;
use crate::error::{CovenantError, CovenantResult};
use crate::extraction::recover_json;
use crate::traits::Llm;
use crate::types::{ContractRecord, Message, RiskAssessment, RiskItem, RiskLevel};

/// Identifies and grades the risks of a contract with one model call.
pub struct RiskAssessmentEngine {
    llm: Arc<dyn Llm>,
    settings: GenerationSettings,
}

impl RiskAssessmentEngine {
    /// Create an engine.
    pub fn new(llm: Arc<dyn Llm>, settings: GenerationSettings) -> Self {
        Self { llm, settings }
    }

    /// Assess a record.
    ///
    /// Never fails. A failed model call or a response with no usable risks
    /// gives an empty low assessment; an internal failure gives an empty
    /// medium one.
    pub async fn assess(&self, record: &ContractRecord) -> RiskAssessment {
        info!(record_id = %record.id, "Starting risk analysis");

        match self.identify(record).await {
            Ok(risks) if risks.is_empty() => {
                info!(record_id = %record.id, "No risks identified");
                self.assessment(record, String::new(), RiskLevel::Low, Vec::new())
            }
            Ok(risks) => {
                let level = overall_level(&risks);
                let summary = summarize(&risks, &self.settings.language);
                info!(
                    record_id = %record.id,
                    risks = risks.len(),
                    overall = %level,
                    "Risk analysis completed"
                );
                self.assessment(record, summary, level, risks)
            }
            Err(e) => {
                error!(record_id = %record.id, "Risk analysis failed: {}", e);
                self.assessment(record, String::new(), RiskLevel::Medium, Vec::new())
            }
        }
    }

    /// Model call and parsing. Model problems yield no risks.
    async fn identify(&self, record: &ContractRecord) -> CovenantResult<Vec<RiskItem>> {
        let messages = vec![
            Message::system(risk_system_prompt()),
            Message::user(risk_user_prompt(record, &self.settings.language)?),
        ];
        let options = self
            .settings
            .options()
            .with_json_mode(self.llm.supports_json_mode());

        let response = match self.llm.generate(&messages, Some(options)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(record_id = %record.id, "Model call failed: {}", e);
                return Ok(Vec::new());
            }
        };

        let content = response.content_or_empty();
        if content.trim().is_empty() {
            warn!(record_id = %record.id, "Model returned empty response");
            return Ok(Vec::new());
        }

        match recover_json(content, self.settings.log_excerpt_chars) {
            Ok(value) => Ok(validate_risks(value)),
            Err(CovenantError::RecoveryFailure { excerpt, .. }) => {
                warn!(
                    record_id = %record.id,
                    "Failed to extract JSON from response: {}...", excerpt
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn assessment(
        &self,
        record: &ContractRecord,
        summary: String,
        overall_level: RiskLevel,
        risks: Vec<RiskItem>,
    ) -> RiskAssessment {
        RiskAssessment {
            record_id: record.id.clone(),
            summary,
            overall_level,
            analysis_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            risks,
        }
    }
}

/// Risk items from a recovered value.
///
/// Accepts `{"risks": [...]}` or a bare list; any other shape has no risks.
/// Items that fail validation are dropped.
pub fn validate_risks(value: Value) -> Vec<RiskItem> {
    let value = match value {
        Value::Array(items) => json!({ "risks": items }),
        other => other,
    };

    let items = match value.get("risks") {
        Some(Value::Array(items)) => items.clone(),
        _ => {
            warn!("Response has no risk list");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<RiskItem>(item) {
            Ok(risk) => Some(risk),
            Err(e) => {
                warn!(index = i, "Dropping invalid risk: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{GenerationOptions, LlmResponse};
    use crate::types::{BasicInfo, Terms};
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Empty,
        Fail,
    }

    struct MockLlm {
        reply: Reply,
        json: bool,
        seen: Mutex<Vec<Option<GenerationOptions>>>,
    }

    #[async_trait]
    impl Llm for MockLlm {
        async fn generate(
            &self,
            _messages: &[Message],
            options: Option<GenerationOptions>,
        ) -> CovenantResult<LlmResponse> {
            self.seen.lock().unwrap().push(options);
            match self.reply {
                Reply::Text(text) => Ok(LlmResponse {
                    content: Some(text.to_string()),
                    usage: None,
                }),
                Reply::Empty => Ok(LlmResponse {
                    content: None,
                    usage: None,
                }),
                Reply::Fail => Err(CovenantError::llm_connection("connection refused")),
            }
        }

        fn model_name(&self) -> &str {
            "mock"
        }

        fn supports_json_mode(&self) -> bool {
            self.json
        }
    }

    fn mock(reply: Reply, json: bool) -> Arc<MockLlm> {
        Arc::new(MockLlm {
            reply,
            json,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn record() -> ContractRecord {
        ContractRecord::new(
            BasicInfo::new("Service Agreement", "service"),
            vec![],
            vec![],
            Terms::default(),
            "The Provider shall deliver the services...",
        )
    }

    fn engine(reply: Reply, language: &str) -> RiskAssessmentEngine {
        let settings = GenerationSettings {
            language: language.to_string(),
            ..Default::default()
        };
        RiskAssessmentEngine::new(mock(reply, true), settings)
    }

    #[tokio::test]
    async fn test_assessment_from_risk_object() {
        let engine = engine(
            Reply::Text(
                r#"```json
{"risks": [
  {"risk_type": "payment risk", "description": "No late fee", "level": "high", "recommendation": "Add a late fee"},
  {"risk_type": "delivery risk", "description": "No deadline", "level": "medium"},
  {"risk_type": "term risk", "description": "Auto renewal", "level": "low"}
]}
```"#,
            ),
            "en",
        );
        let record = record();
        let assessment = engine.assess(&record).await;

        assert_eq!(assessment.record_id, record.id);
        assert_eq!(assessment.risks.len(), 3);
        assert_eq!(assessment.overall_level, RiskLevel::Medium);
        assert_eq!(assessment.count(RiskLevel::High), 1);
        assert!(assessment.summary.contains("payment risk: No late fee"));
        assert_eq!(assessment.analysis_date.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&assessment.analysis_date, "%Y-%m-%d").is_ok());
    }

    #[tokio::test]
    async fn test_bare_list_is_wrapped() {
        let engine = engine(
            Reply::Text(
                r#"[{"risk_type": "合规风险", "description": "缺少争议解决条款", "level": "高"},
                    {"risk_type": "付款风险", "description": "付款期限不明", "level": "高"},
                    {"risk_type": "违约风险", "description": "违约金过高", "level": "高"}]"#,
            ),
            "zh-CN",
        );
        let assessment = engine.assess(&record()).await;
        assert_eq!(assessment.risks.len(), 3);
        assert_eq!(assessment.overall_level, RiskLevel::High);
        assert!(assessment.summary.starts_with("本合同共识别出3个风险点"));
    }

    #[tokio::test]
    async fn test_invalid_items_dropped() {
        let engine = engine(
            Reply::Text(
                r#"{"risks": [{"risk_type": "payment risk", "description": "x", "level": "critical"},
                              {"risk_type": "delivery risk", "description": "y", "level": "medium"},
                              {"risk_type": "delivery risk", "description": "z", "level": "medium"}]}"#,
            ),
            "en",
        );
        let assessment = engine.assess(&record()).await;
        assert_eq!(assessment.risks.len(), 2);
        assert_eq!(assessment.overall_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_no_risks_is_low() {
        for reply in [
            Reply::Text(r#"{"risks": []}"#),
            Reply::Text(r#"{"findings": "none"}"#),
            Reply::Text("No risks found."),
            Reply::Empty,
        ] {
            let assessment = engine(reply, "en").assess(&record()).await;
            assert!(assessment.risks.is_empty());
            assert_eq!(assessment.overall_level, RiskLevel::Low);
            assert_eq!(assessment.summary, "");
        }
    }

    #[tokio::test]
    async fn test_model_failure_is_low() {
        let record = record();
        let assessment = engine(Reply::Fail, "en").assess(&record).await;
        assert!(assessment.risks.is_empty());
        assert_eq!(assessment.overall_level, RiskLevel::Low);
        assert_eq!(assessment.summary, "");
        assert_eq!(assessment.record_id, record.id);
    }

    #[tokio::test]
    async fn test_json_mode_follows_model_support() {
        for json in [true, false] {
            let llm = mock(Reply::Text(r#"{"risks": []}"#), json);
            let engine = RiskAssessmentEngine::new(llm.clone(), GenerationSettings::default());
            engine.assess(&record()).await;

            let seen = llm.seen.lock().unwrap();
            let options = seen[0].as_ref().unwrap();
            assert_eq!(options.json_mode, json);
            assert_eq!(options.temperature, Some(0.1));
        }
    }

    #[test]
    fn test_validate_risks_shapes() {
        let item = json!({"risk_type": "t", "description": "d", "level": "low"});
        assert_eq!(validate_risks(json!([item.clone()])).len(), 1);
        assert_eq!(validate_risks(json!({"risks": [item]})).len(), 1);
        assert!(validate_risks(json!("text")).is_empty());
        assert!(validate_risks(json!({"risks": "none"})).is_empty());
    }
}
