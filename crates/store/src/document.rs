//! Document envelope and query predicates.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// A document returned by the store: its id plus a schema-less field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decode the field map into a typed entity.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.fields.clone()).map_err(StoreError::Decode)
    }
}

/// Query predicate supported by the store contract.
///
/// Only single-field equality and array membership are part of the
/// contract; the core never composes predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field == value`.
    FieldEquals { field: String, value: Value },
    /// `value ∈ field`, where `field` holds an array.
    ArrayContains { field: String, value: Value },
}

impl Predicate {
    pub fn field_equals(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::FieldEquals {
            field: field.into(),
            value: serde_json::to_value(value).unwrap_or(Value::Null),
        }
    }

    pub fn array_contains(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::ArrayContains {
            field: field.into(),
            value: serde_json::to_value(value).unwrap_or(Value::Null),
        }
    }

    /// Evaluate the predicate against a document field map.
    pub fn matches(&self, fields: &Value) -> bool {
        match self {
            Predicate::FieldEquals { field, value } => fields.get(field) == Some(value),
            Predicate::ArrayContains { field, value } => fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        }
    }
}
