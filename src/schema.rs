//! Standalone JSON Schema documents for the adapter's wire contract: the
//! proxy event it accepts and the response it returns. Each model is a
//! complete draft-07 schema with its `$schema` and `title` kept.

use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde_json::Value;

use crate::models::{AdapterResponse, InboundEvent};

/// One schema document and the file it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    pub file_name: &'static str,
    pub schema: Value,
}

/// Schemas for the inbound event model and the response model.
///
/// # Errors
///
/// Returns an error if a generated schema cannot be converted to JSON.
pub fn model_schemas() -> Result<Vec<ModelSchema>, serde_json::Error> {
    Ok(vec![
        ModelSchema {
            file_name: "inbound_event.schema.json",
            schema: model_schema::<InboundEvent>()?,
        },
        ModelSchema {
            file_name: "adapter_response.schema.json",
            schema: model_schema::<AdapterResponse>()?,
        },
    ])
}

fn model_schema<T: JsonSchema>() -> Result<Value, serde_json::Error> {
    let schema = SchemaSettings::draft07()
        .into_generator()
        .into_root_schema_for::<T>();
    serde_json::to_value(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_named(file_name: &str) -> Value {
        model_schemas()
            .unwrap()
            .into_iter()
            .find(|model| model.file_name == file_name)
            .unwrap()
            .schema
    }

    #[test]
    fn test_one_standalone_document_per_model() {
        let schemas = model_schemas().unwrap();
        assert_eq!(schemas.len(), 2);

        for model in &schemas {
            assert!(model.schema.get("inputSchema").is_none());
            assert_eq!(
                model.schema["$schema"],
                "http://json-schema.org/draft-07/schema#"
            );
            assert_eq!(model.schema["type"], "object");
        }
    }

    #[test]
    fn test_inbound_event_schema_lists_proxy_fields() {
        let schema = schema_named("inbound_event.schema.json");
        assert_eq!(schema["title"], "InboundEvent");

        let properties = schema["properties"].as_object().unwrap();
        for field in ["headers", "queryStringParameters", "body"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
        assert!(schema.get("required").is_none_or(|r| r == &json!([])));
    }

    #[test]
    fn test_response_schema_requires_status_and_body() {
        let schema = schema_named("adapter_response.schema.json");
        assert_eq!(schema["title"], "AdapterResponse");
        assert_eq!(schema["properties"]["statusCode"]["type"], "integer");
        assert_eq!(schema["properties"]["body"]["type"], "string");

        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("statusCode")));
        assert!(required.contains(&json!("body")));
    }
}
