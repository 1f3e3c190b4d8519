//! Metadata filter language
//!
//! Filters are written as JSON:
//!
//! ```text
//! {"topic": "rust"}                                  equality
//! {"year": {"$gte": 2020}}                           comparison
//! {"lang": {"$in": ["en", "de"]}}                    membership
//! {"$or": [{"topic": "rust"}, {"topic": "go"}]}      logical
//! {"topic": "rust", "year": {"$lt": 2024}}           implicit $and
//! ```
//!
//! Ordering operators compare numbers only. A record lacking the field never
//! matches, except under `$ne` and `$nin`.

use serde_json::{Map, Value};
use zmem_core::{Error, Result};

/// A scalar operand
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Scalar::String(s.clone())),
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(Scalar::Number)
                .ok_or_else(|| Error::validation(format!("Unsupported number in filter: {}", n))),
            other => Err(Error::validation(format!(
                "Filter values must be strings, numbers or booleans, got: {}",
                other
            ))),
        }
    }

    fn equals(&self, value: &Value) -> bool {
        match (self, value) {
            (Scalar::String(a), Value::String(b)) => a == b,
            (Scalar::Bool(a), Value::Bool(b)) => a == b,
            (Scalar::Number(a), Value::Number(b)) => b.as_f64() == Some(*a),
            _ => false,
        }
    }
}

/// Condition applied to one metadata field
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Eq(Scalar),
    Ne(Scalar),
    Gt(f64),
    Gte(f64),
    Lt(f64),
    Lte(f64),
    In(Vec<Scalar>),
    Nin(Vec<Scalar>),
}

impl Comparison {
    fn parse(operator: &str, operand: &Value) -> Result<Self> {
        let number = || {
            operand.as_f64().ok_or_else(|| {
                Error::validation(format!("Operator {} requires a number", operator))
            })
        };
        let list = || -> Result<Vec<Scalar>> {
            operand
                .as_array()
                .ok_or_else(|| Error::validation(format!("Operator {} requires a list", operator)))?
                .iter()
                .map(Scalar::from_json)
                .collect()
        };

        match operator {
            "$eq" => Ok(Comparison::Eq(Scalar::from_json(operand)?)),
            "$ne" => Ok(Comparison::Ne(Scalar::from_json(operand)?)),
            "$gt" => Ok(Comparison::Gt(number()?)),
            "$gte" => Ok(Comparison::Gte(number()?)),
            "$lt" => Ok(Comparison::Lt(number()?)),
            "$lte" => Ok(Comparison::Lte(number()?)),
            "$in" => Ok(Comparison::In(list()?)),
            "$nin" => Ok(Comparison::Nin(list()?)),
            other => Err(Error::validation(format!(
                "Unknown filter operator: {}",
                other
            ))),
        }
    }

    fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Comparison::Eq(s) => value.is_some_and(|v| s.equals(v)),
            Comparison::Ne(s) => !value.is_some_and(|v| s.equals(v)),
            Comparison::Gt(n) => number_of(value).is_some_and(|v| v > *n),
            Comparison::Gte(n) => number_of(value).is_some_and(|v| v >= *n),
            Comparison::Lt(n) => number_of(value).is_some_and(|v| v < *n),
            Comparison::Lte(n) => number_of(value).is_some_and(|v| v <= *n),
            Comparison::In(list) => value.is_some_and(|v| list.iter().any(|s| s.equals(v))),
            Comparison::Nin(list) => !value.is_some_and(|v| list.iter().any(|s| s.equals(v))),
        }
    }
}

fn number_of(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
}

/// A parsed metadata filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Field { field: String, condition: Comparison },
}

impl Filter {
    /// Parse a filter document
    ///
    /// Malformed documents, including an empty object, are validation errors.
    pub fn parse(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::validation("Filter must be a JSON object"))?;

        if object.is_empty() {
            return Err(Error::validation(
                "Filter must contain at least one condition",
            ));
        }

        let mut conditions = object
            .iter()
            .map(|(key, value)| Self::parse_entry(key, value))
            .collect::<Result<Vec<_>>>()?;

        if conditions.len() == 1 {
            Ok(conditions.remove(0))
        } else {
            Ok(Filter::And(conditions))
        }
    }

    /// Parse an optional filter, treating `null` and `{}` as no filter
    pub fn optional(value: Option<&Value>) -> Result<Option<Self>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }

    fn parse_entry(key: &str, value: &Value) -> Result<Self> {
        match key {
            "$and" => Ok(Filter::And(Self::parse_list(key, value)?)),
            "$or" => Ok(Filter::Or(Self::parse_list(key, value)?)),
            _ if key.starts_with('$') => Err(Error::validation(format!(
                "Unknown logical operator: {}",
                key
            ))),
            "" => Err(Error::validation("Filter field names cannot be empty")),
            field => Ok(Filter::Field {
                field: field.to_string(),
                condition: Self::parse_condition(field, value)?,
            }),
        }
    }

    fn parse_list(operator: &str, value: &Value) -> Result<Vec<Self>> {
        let items = value
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| {
                Error::validation(format!("{} requires a non-empty list of filters", operator))
            })?;

        items.iter().map(Self::parse).collect()
    }

    fn parse_condition(field: &str, value: &Value) -> Result<Comparison> {
        match value {
            Value::Object(operators) => {
                let mut entries = operators.iter();
                match (entries.next(), entries.next()) {
                    (Some((operator, operand)), None) => Comparison::parse(operator, operand),
                    _ => Err(Error::validation(format!(
                        "Condition on '{}' must have exactly one operator",
                        field
                    ))),
                }
            }
            scalar => Ok(Comparison::Eq(Scalar::from_json(scalar)?)),
        }
    }

    /// Whether a record's metadata satisfies this filter
    pub fn matches(&self, metadata: &Map<String, Value>) -> bool {
        match self {
            Filter::And(filters) => filters.iter().all(|f| f.matches(metadata)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(metadata)),
            Filter::Field { field, condition } => condition.matches(metadata.get(field)),
        }
    }
}
