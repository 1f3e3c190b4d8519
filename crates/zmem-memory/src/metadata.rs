//! Structured memory metadata
//!
//! Every record carries `original_text`, the verbatim text it was created
//! from. Callers may attach extra fields; these must be scalars (string,
//! number or boolean) under non-empty keys.

use serde_json::{Map, Value};
use zmem_core::{Error, Result};

/// Metadata key holding the stored text
pub const ORIGINAL_TEXT_KEY: &str = "original_text";

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMetadata {
    original_text: String,
    extra: Map<String, Value>,
}

impl MemoryMetadata {
    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            extra: Map::new(),
        }
    }

    /// Merge caller fields over this metadata
    ///
    /// A caller-supplied `original_text` replaces the current one.
    pub fn with_fields(mut self, fields: Map<String, Value>) -> Result<Self> {
        validate_fields(&fields)?;

        for (key, value) in fields {
            if key == ORIGINAL_TEXT_KEY {
                if let Value::String(text) = value {
                    self.original_text = text;
                }
            } else {
                self.extra.insert(key, value);
            }
        }
        Ok(self)
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Flatten into the map handed to the store
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = self.extra;
        map.insert(
            ORIGINAL_TEXT_KEY.to_string(),
            Value::String(self.original_text),
        );
        map
    }
}

/// Check caller-supplied fields at the boundary
pub fn validate_fields(fields: &Map<String, Value>) -> Result<()> {
    for (key, value) in fields {
        if key.is_empty() {
            return Err(Error::validation("Metadata keys cannot be empty."));
        }
        match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {}
            _ => {
                return Err(Error::validation(format!(
                    "Metadata value for '{}' must be a string, number or boolean.",
                    key
                )));
            }
        }
        if key == ORIGINAL_TEXT_KEY && !value.is_string() {
            return Err(Error::validation(format!(
                "Metadata value for '{}' must be a string.",
                ORIGINAL_TEXT_KEY
            )));
        }
    }
    Ok(())
}

/// Caller metadata as an object; `null` or absent means no fields
pub fn fields_from(value: Option<Value>) -> Result<Map<String, Value>> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => {
            validate_fields(&map)?;
            Ok(map)
        }
        Some(_) => Err(Error::validation("Metadata must be a JSON object.")),
    }
}

/// Stored text of a record, if it has a usable one
pub fn original_text_of(metadata: Option<&Map<String, Value>>) -> Option<String> {
    metadata
        .and_then(|m| m.get(ORIGINAL_TEXT_KEY))
        .and_then(Value::as_str)
        .map(str::to_string)
}
