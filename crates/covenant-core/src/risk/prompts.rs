//! Prompts for risk analysis.

use serde_json::{json, Value};

use crate::error::CovenantResult;
use crate::extraction::prompts::{language_directive, JSON_OUTPUT_RULES};
use crate::extraction::strip_fields;
use crate::types::ContractRecord;

/// System instruction for risk analysis.
pub fn risk_system_prompt() -> String {
    format!(
        r#"You are a professional legal contract risk analyst with deep expertise in contract law,
risk assessment and regulatory compliance.

You identify legal, commercial, operational and financial risks in contracts, judge
their severity and likelihood, and recommend how to mitigate them. Cover in particular:
- compliance risks (regulatory violations, jurisdiction issues)
- commercial risks (payment default, non-performance, market changes)
- operational risks (late delivery, quality problems, resource constraints)
- financial risks (currency movements, cost overruns, liability exposure)

Report only what the contract supports; do not speculate beyond it.

## DATA FORMAT STANDARDS
1. Risk levels: use only "high", "medium" or "low", weighing severity and likelihood.
2. Risk types: specific names such as "compliance risk", "payment risk", "delivery risk".
3. Missing information: null. Do not guess.

{rules}"#,
        rules = JSON_OUTPUT_RULES
    )
}

/// Schema of the risk list the model must return.
pub fn risk_schema() -> Value {
    let item = json!({
        "title": "ContractRisk",
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "risk_type": {"type": "string", "description": "Category of the risk"},
            "description": {"type": "string", "description": "What the risk is and what it could lead to"},
            "level": {"type": "string", "enum": ["high", "medium", "low"]},
            "recommendation": {
                "anyOf": [{"type": "string"}, {"type": "null"}],
                "default": null,
                "description": "How to handle or mitigate the risk"
            }
        },
        "required": ["risk_type", "description", "level"]
    });
    let schema = json!({
        "type": "object",
        "properties": {"risks": {"type": "array", "items": item}},
        "required": ["risks"]
    });
    strip_fields(schema, &["id"])
}

/// User instruction carrying the contract text and its extracted structure.
pub fn risk_user_prompt(record: &ContractRecord, language: &str) -> CovenantResult<String> {
    let contract_info = json!({
        "basic_info": serde_json::to_value(&record.basic_info)?,
        "parties": serde_json::to_value(&record.parties)?,
        "subjects": serde_json::to_value(&record.subjects)?,
        "terms": {"terms": serde_json::to_value(&record.terms.terms)?},
    });

    Ok(format!(
        r#"## TASK
Analyse the risks in the contract below according to the JSON schema.

## GUIDELINES
1. Read both the contract text and its structured information, and identify legal,
   commercial and operational risks.
2. For each risk give risk_type (compliance, payment, delivery, breach...), a
   description of the risk and its consequences, a level ("high", "medium" or
   "low") and a recommendation.
3. Typical risk points:
   - terms that contradict or fall outside applicable law
   - inconsistent or contradictory provisions
   - terms well above or below industry norms
   - missing or incomplete clauses
   - vague or ambiguous wording
   - unbalanced rights and obligations
   - unclear allocation of responsibility
   - breach liability that is unclear, too light or too heavy
   - weak dispute resolution
4. Order the risks from highest to lowest level.

## JSON SCHEMA
The schema is enclosed in <schema></schema> tags:
<schema>
{schema}
</schema>

## CONTRACT
The contract text is enclosed in <contract></contract> tags:
<contract>
{text}
</contract>

## CONTRACT STRUCTURE
The extracted contract information is enclosed in <contract_info></contract_info> tags:
<contract_info>
{info}
</contract_info>

**{language}**"#,
        schema = serde_json::to_string_pretty(&risk_schema())?,
        text = record.raw_text,
        info = serde_json::to_string_pretty(&contract_info)?,
        language = language_directive(language),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BasicInfo, Party, Terms};

    #[test]
    fn test_risk_schema_has_no_id() {
        let schema = risk_schema();
        let props = schema["properties"]["risks"]["items"]["properties"]
            .as_object()
            .unwrap();
        assert!(!props.contains_key("id"));
        assert!(props.contains_key("level"));
    }

    #[test]
    fn test_user_prompt_embeds_record() {
        let record = ContractRecord::new(
            BasicInfo::new("Supply Agreement", "sales"),
            vec![Party::new("Acme", "company")],
            vec![],
            Terms::default(),
            "THIS SUPPLY AGREEMENT is made...",
        );
        let prompt = risk_user_prompt(&record, "en").unwrap();
        assert!(prompt.contains("<contract>\nTHIS SUPPLY AGREEMENT is made...\n</contract>"));
        assert!(prompt.contains("\"title\": \"Supply Agreement\""));
        assert!(prompt.contains("\"terms\": {"));
        assert!(prompt.contains("<contract_info>"));
    }
}
