use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

/// Generates the input schema advertised for a tool from its request type.
///
/// The draft marker and title are dropped; MCP clients only need the object
/// schema itself.
pub fn generate_schema<T: JsonSchema>() -> Value {
    let schema = schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or(Value::Null);

    if let Value::Object(ref mut obj) = value {
        obj.remove("$schema");
        obj.remove("title");
        obj.entry("type")
            .or_insert_with(|| Value::String("object".to_string()));
        obj.entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
    }

    value
}
