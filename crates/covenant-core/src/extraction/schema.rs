//! Extraction components and the JSON schemas shown to the model.

use serde_json::{json, Map, Value};
use strum::Display;

/// Fields the store assigns itself; never asked of the model.
pub const INFRASTRUCTURE_FIELDS: [&str; 3] = ["id", "start_position", "end_position"];

/// One unit of the staged extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ComponentKind {
    BasicInfo,
    Parties,
    Subjects,
    Terms,
}

/// Whether a component yields one value or a list of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Singleton,
    List,
}

impl ComponentKind {
    /// Components in extraction order.
    pub const PIPELINE: [ComponentKind; 4] = [
        ComponentKind::BasicInfo,
        ComponentKind::Parties,
        ComponentKind::Subjects,
        ComponentKind::Terms,
    ];

    /// Key used in prompts, logs and wrapped schemas.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BasicInfo => "basic_info",
            Self::Parties => "parties",
            Self::Subjects => "subjects",
            Self::Terms => "terms",
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::BasicInfo | Self::Terms => Cardinality::Singleton,
            Self::Parties | Self::Subjects => Cardinality::List,
        }
    }

    /// Schema of the record, or of one list element.
    pub fn element_schema(&self) -> Value {
        match self {
            Self::BasicInfo => basic_info_schema(),
            Self::Parties => party_schema(),
            Self::Subjects => subject_schema(),
            Self::Terms => terms_schema(),
        }
    }

    /// Schema presented to the model, infrastructure fields removed.
    ///
    /// List components are wrapped in an object under their own key.
    pub fn presented_schema(&self) -> Value {
        let schema = match self.cardinality() {
            Cardinality::Singleton => self.element_schema(),
            Cardinality::List => json!({
                "type": "object",
                "properties": {
                    (self.name()): {
                        "type": "array",
                        "items": self.element_schema()
                    }
                },
                "required": [self.name()]
            }),
        };
        strip_fields(schema, &INFRASTRUCTURE_FIELDS)
    }
}

/// Remove fields from every `properties` map and `required` list, recursively.
pub fn strip_fields(mut schema: Value, fields: &[&str]) -> Value {
    strip_in_place(&mut schema, fields);
    schema
}

fn strip_in_place(value: &mut Value, fields: &[&str]) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(props)) = map.get_mut("properties") {
                props.retain(|k, _| !fields.contains(&k.as_str()));
            }
            if let Some(Value::Array(required)) = map.get_mut("required") {
                required.retain(|v| v.as_str().map_or(true, |s| !fields.contains(&s)));
            }
            for child in map.values_mut() {
                strip_in_place(child, fields);
            }
        }
        Value::Array(items) => {
            for child in items {
                strip_in_place(child, fields);
            }
        }
        _ => {}
    }
}

fn nullable_string(description: &str) -> Value {
    json!({ "anyOf": [{"type": "string"}, {"type": "null"}], "default": null, "description": description })
}

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn object(title: &str, properties: Map<String, Value>, required: &[&str]) -> Value {
    json!({
        "title": title,
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn id_field(properties: &mut Map<String, Value>) {
    properties.insert("id".to_string(), string("Unique identifier"));
}

fn basic_info_schema() -> Value {
    let mut p = Map::new();
    id_field(&mut p);
    p.insert("title".into(), string("Full title of the contract"));
    p.insert("contract_number".into(), nullable_string("Number that uniquely identifies the contract"));
    p.insert("contract_type".into(), string("Kind of contract, e.g. sales, lease, services"));
    p.insert("signing_date".into(), nullable_string("Date the contract was signed, YYYY-MM-DD"));
    p.insert("effective_date".into(), nullable_string("Date the contract takes effect, YYYY-MM-DD"));
    p.insert("expiration_date".into(), nullable_string("Date the contract expires, YYYY-MM-DD"));
    p.insert("language".into(), nullable_string("ISO 639-1 language code of the contract"));
    p.insert("country".into(), nullable_string("ISO 3166-1 alpha-2 code of the governing country"));
    p.insert("summary".into(), nullable_string("Short description of the contract"));
    p.insert("legal_basis".into(), nullable_string("Laws and regulations the contract cites"));
    p.insert("signing_place".into(), nullable_string("Place where the contract was signed"));
    object("ContractBasicInfo", p, &["title", "contract_type"])
}

fn party_schema() -> Value {
    let mut p = Map::new();
    id_field(&mut p);
    p.insert("name".into(), string("Full name of the party"));
    p.insert("party_type".into(), string("Kind of party, e.g. company, individual, government agency"));
    p.insert("role".into(), nullable_string("Role in the contract, e.g. seller, buyer, investor"));
    p.insert("address".into(), nullable_string("Registered or mailing address"));
    p.insert("country".into(), nullable_string("Country of the party"));
    p.insert("province_state".into(), nullable_string("Province, city or state of the party"));
    p.insert("contact".into(), nullable_string("Contact person"));
    p.insert("phone".into(), nullable_string("Phone number"));
    p.insert("email".into(), nullable_string("Email address"));
    p.insert("representative".into(), nullable_string("Legal or authorised representative"));
    p.insert("id_number".into(), nullable_string("Registration or identity document number"));
    object("ContractParty", p, &["name", "party_type"])
}

fn subject_schema() -> Value {
    let mut p = Map::new();
    id_field(&mut p);
    p.insert("name".into(), string("Name of the subject matter"));
    p.insert("subject_type".into(), string("Kind of subject, e.g. goods, real estate, intellectual property"));
    p.insert("description".into(), string("Detailed description"));
    p.insert("specification".into(), nullable_string("Specification or parameters"));
    p.insert("location".into(), nullable_string("Location or place of delivery"));
    p.insert("transaction_price".into(), nullable_string("Transaction price, original currency and format"));
    object("ContractSubject", p, &["name", "subject_type", "description"])
}

fn term_schema() -> Value {
    let mut p = Map::new();
    id_field(&mut p);
    p.insert("term_type".into(), string("Kind of clause, e.g. payment, delivery, confidentiality"));
    p.insert(
        "excerpts".into(),
        json!({
            "type": "array",
            "items": {"type": "string"},
            "description": "Passages quoted verbatim from the contract"
        }),
    );
    p.insert("start_position".into(), json!({"anyOf": [{"type": "integer"}, {"type": "null"}]}));
    p.insert("end_position".into(), json!({"anyOf": [{"type": "integer"}, {"type": "null"}]}));
    object("ContractTerm", p, &["term_type"])
}

fn terms_schema() -> Value {
    let mut p = Map::new();
    p.insert("terms".into(), json!({"type": "array", "items": term_schema()}));
    object("ContractTerms", p, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains_infrastructure_field(value: &Value) -> bool {
        match value {
            Value::Object(map) => {
                let in_props = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map_or(false, |p| INFRASTRUCTURE_FIELDS.iter().any(|f| p.contains_key(*f)));
                in_props || map.values().any(contains_infrastructure_field)
            }
            Value::Array(items) => items.iter().any(contains_infrastructure_field),
            _ => false,
        }
    }

    #[test]
    fn test_pipeline_order() {
        let names: Vec<_> = ComponentKind::PIPELINE.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["basic_info", "parties", "subjects", "terms"]);
    }

    #[test]
    fn test_list_components_are_wrapped() {
        let schema = ComponentKind::Parties.presented_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["parties"]));
        assert_eq!(schema["properties"]["parties"]["type"], "array");
        assert_eq!(schema["properties"]["parties"]["items"]["title"], "ContractParty");
    }

    #[test]
    fn test_singleton_is_not_wrapped() {
        let schema = ComponentKind::BasicInfo.presented_schema();
        assert_eq!(schema["title"], "ContractBasicInfo");
        assert_eq!(schema["required"], json!(["title", "contract_type"]));
    }

    #[test]
    fn test_infrastructure_fields_stripped_at_every_depth() {
        for kind in ComponentKind::PIPELINE {
            assert!(
                !contains_infrastructure_field(&kind.presented_schema()),
                "{} still exposes infrastructure fields",
                kind
            );
        }
        // The raw element schemas still carry them
        assert!(contains_infrastructure_field(&ComponentKind::Terms.element_schema()));
    }

    #[test]
    fn test_strip_fields_updates_required() {
        let schema = json!({"properties": {"id": {}, "a": {}}, "required": ["id", "a"]});
        let stripped = strip_fields(schema, &["id"]);
        assert_eq!(stripped, json!({"properties": {"a": {}}, "required": ["a"]}));
    }
}
