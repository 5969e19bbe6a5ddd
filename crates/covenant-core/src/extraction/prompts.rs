//! Prompts for component extraction.

use serde_json::Value;

use super::schema::ComponentKind;

/// Output rules shared by every structured model call.
pub const JSON_OUTPUT_RULES: &str = r#"## JSON OUTPUT RULES
When given a JSON schema, answer with a single JSON value that follows it exactly.

1. Output only JSON. No prose before or after it, no code fences, no surrounding quotes.
2. Use double quotes for every key and string value. Numbers, booleans and null are unquoted.
3. No comments and no fields the schema does not define.
4. Close every object and array you open.
5. Use null for missing values, never undefined, "N/A" or an empty string.
6. Use [] and {} for empty arrays and objects rather than null.
7. Escape special characters in strings, e.g. "Line 1\nLine 2"."#;

/// System instruction for contract component extraction.
pub fn extraction_system_prompt() -> String {
    format!(
        r#"You are a professional legal contract reviewer with deep expertise in contract law.

You identify key terms, clauses and obligations, and you extract structured information
from contract documents. Report only what the document states; do not infer beyond it.

## DATA FORMAT STANDARDS
1. Dates: ISO 8601 (YYYY-MM-DD). Preserve the date as written; do not correct it. Unknown dates are null.
2. Money: keep the original currency symbol or code and number formatting (e.g. "50,000.00"). Never convert currencies. Unknown amounts are null.
3. Countries: ISO 3166-1 alpha-2 codes (e.g. "CN", "US").
   Languages: ISO 639-1 codes with optional region ("zh-CN", "zh-TW", "en-US", "en-GB", "fr").
   When unsure of the code, use the full name.
4. Missing information: null. Do not guess.

{rules}"#,
        rules = JSON_OUTPUT_RULES
    )
}

/// Directive telling the model which language to answer in.
///
/// `zh` is treated as `zh-CN`; unknown codes fall back to `zh-CN`.
pub fn language_directive(language: &str) -> &'static str {
    match language {
        "zh-CN" | "zh" => "请使用简体中文回答问题。",
        "zh-TW" => "請使用繁體中文回答問題。",
        "en" => "Please answer the following questions in English.",
        "ja" => "以下の質問に日本語で答えてください。",
        "ko" => "다음 질문에 한국어로 답변해 주세요.",
        "fr" => "Veuillez répondre aux questions suivantes en français.",
        "de" => "Bitte beantworten Sie die folgenden Fragen auf Deutsch.",
        "es" => "Por favor, responda a las siguientes preguntas en español.",
        "ru" => "Пожалуйста, ответьте на следующие вопросы на русском языке.",
        _ => "请使用简体中文回答问题。",
    }
}

fn component_instruction(kind: ComponentKind) -> &'static str {
    match kind {
        ComponentKind::BasicInfo => {
            r#"## TASK
Extract the basic information of the contract below according to the JSON schema.

## GUIDELINES
1. Capture: title, contract_number, contract_type (e.g. sales, lease, services),
   signing_date, effective_date, expiration_date, language (ISO 639-1),
   country (ISO 3166-1 alpha-2), summary, legal_basis and signing_place.
2. Look closely at the title, the opening recitals and the signature block,
   where this information usually appears.
3. Be as complete and precise as the text allows."#
        }
        ComponentKind::Parties => {
            r#"## TASK
Extract every party to the contract below according to the JSON schema.

## GUIDELINES
1. Identify all individuals, companies and organisations named as parties.
2. For each party capture: name, party_type (company, individual, government agency...),
   role (seller, buyer, investor...), address, country, province_state, contact,
   phone, email, representative and id_number (business licence, ID card...).
3. Parties are usually introduced in the preamble and repeated in the signature block.
4. Return an object with a "parties" key holding an array."#
        }
        ComponentKind::Subjects => {
            r#"## TASK
Extract the subject matter of the contract below according to the JSON schema.

## GUIDELINES
1. Identify what is exchanged, sold, bought, licensed or otherwise transacted.
2. For each subject capture: name, subject_type (goods, real estate, intellectual
   property...), description, specification, location and transaction_price.
3. Subjects are usually described in the main body, often in a dedicated section.
4. Return an object with a "subjects" key holding an array."#
        }
        ComponentKind::Terms => {
            r#"## TASK
Extract the terms and conditions of the contract below according to the JSON schema.

## GUIDELINES
1. Read the text as a lawyer and identify the clauses it actually contains.
2. For each clause type give term_type (payment, delivery, confidentiality...) and
   excerpts quoted verbatim from the contract.
3. Classify by substance, not by heading: a passage with no title or number still
   counts if its content matches a clause type, and one clause type may be spread
   across several sections.
4. Typical clause types: rights and obligations, conditions of performance,
   exclusivity, non-compete, payment, delivery, warranty, service levels,
   liability for breach, dispute resolution, confidentiality, force majeure,
   amendment, termination, intellectual property.
5. Only report clauses that are present in the text."#
        }
    }
}

/// User instruction for one component: task guidance, schema, source text and language.
pub fn extraction_user_prompt(kind: ComponentKind, text: &str, schema: &Value, language: &str) -> String {
    let schema = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
    format!(
        r#"{instruction}

## JSON SCHEMA
The schema is enclosed in <schema></schema> tags:
<schema>
{schema}
</schema>

## CONTRACT TEXT
The contract text is enclosed in <contract></contract> tags:
<contract>
{text}
</contract>

**{language}**"#,
        instruction = component_instruction(kind),
        schema = schema,
        text = text,
        language = language_directive(language),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_language_table() {
        assert_eq!(language_directive("en"), "Please answer the following questions in English.");
        assert_eq!(language_directive("zh"), language_directive("zh-CN"));
        assert_eq!(language_directive("xx"), language_directive("zh-CN"));
        assert!(language_directive("de").contains("Deutsch"));
    }

    #[test]
    fn test_user_prompt_sections() {
        let prompt = extraction_user_prompt(
            ComponentKind::Parties,
            "Seller: Acme Ltd.",
            &json!({"type": "object"}),
            "en",
        );
        assert!(prompt.contains("<schema>"));
        assert!(prompt.contains("<contract>\nSeller: Acme Ltd.\n</contract>"));
        assert!(prompt.contains("\"parties\" key"));
        assert!(prompt.ends_with("**Please answer the following questions in English.**"));
    }

    #[test]
    fn test_system_prompt_has_rules() {
        let prompt = extraction_system_prompt();
        assert!(prompt.contains("YYYY-MM-DD"));
        assert!(prompt.contains("JSON OUTPUT RULES"));
    }
}
