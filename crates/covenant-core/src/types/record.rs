//! Structured contract record types.
//!
//! Every component deserializes straight from the JSON value recovered from
//! the model, so these types double as the validation step: a value that
//! fails `serde_json::from_value` is a validation failure.

use serde::{Deserialize, Deserializer, Serialize};

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Accept strings, numbers and booleans for free-text fields.
///
/// Models often emit prices or numbers as bare JSON numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected a string, found {}",
                other
            )))
        }
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifying information of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(default = "new_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contract_number: Option<String>,
    pub contract_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub signing_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub effective_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expiration_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub legal_basis: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub signing_place: Option<String>,
}

impl BasicInfo {
    /// Create basic info with the two required fields.
    pub fn new(title: impl Into<String>, contract_type: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            contract_number: None,
            contract_type: contract_type.into(),
            signing_date: None,
            effective_date: None,
            expiration_date: None,
            language: None,
            country: None,
            summary: None,
            legal_basis: None,
            signing_place: None,
        }
    }
}

/// A person or organisation bound by the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    pub party_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub province_state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub representative: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id_number: Option<String>,
}

impl Party {
    /// Create a party with the required fields.
    pub fn new(name: impl Into<String>, party_type: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            party_type: party_type.into(),
            role: None,
            address: None,
            country: None,
            province_state: None,
            contact: None,
            phone: None,
            email: None,
            representative: None,
            id_number: None,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Goods, services or rights exchanged under the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    pub subject_type: String,
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub specification: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_price: Option<String>,
}

impl Subject {
    /// Create a subject with the required fields.
    pub fn new(
        name: impl Into<String>,
        subject_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            subject_type: subject_type.into(),
            description: description.into(),
            specification: None,
            location: None,
            transaction_price: None,
        }
    }
}

/// One category of clause together with the passages that express it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    #[serde(default = "new_id")]
    pub id: String,
    pub term_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub excerpts: Vec<String>,
}

impl Term {
    /// Create a term.
    pub fn new(term_type: impl Into<String>, excerpts: Vec<String>) -> Self {
        Self {
            id: new_id(),
            term_type: term_type.into(),
            excerpts,
        }
    }
}

/// The clause categories of a contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terms {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub terms: Vec<Term>,
}

/// The assembled result of an extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    #[serde(default = "new_id")]
    pub id: String,
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub terms: Terms,
    #[serde(default)]
    pub raw_text: String,
}

impl ContractRecord {
    /// Assemble a record from its components.
    pub fn new(
        basic_info: BasicInfo,
        parties: Vec<Party>,
        subjects: Vec<Subject>,
        terms: Terms,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            basic_info,
            parties,
            subjects,
            terms,
            raw_text: raw_text.into(),
        }
    }
}

/// Requested extraction depth. Recorded in logs; every depth runs the full pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExtractionDepth {
    #[default]
    Basic,
    Detailed,
}
