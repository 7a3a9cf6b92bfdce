use crate::error::{Result, TransposeError};
use crate::value::ScalarValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of a record: either a plain value or a related sub-record
/// reachable through a dotted path segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Value(ScalarValue),
    Relation(Record),
}

/// A row as produced by a query source. Keys may themselves be dotted
/// (`student.role.name`) when a source has already flattened a projection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Field>,
}

impl Record {
    pub fn new() -> Self { Self { fields: BTreeMap::new() } }

    pub fn with(mut self, name: &str, value: impl Into<ScalarValue>) -> Self {
        self.fields.insert(name.to_string(), Field::Value(value.into()));
        self
    }

    pub fn with_relation(mut self, name: &str, related: Record) -> Self {
        self.fields.insert(name.to_string(), Field::Relation(related));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> { self.fields.get(name) }
    pub fn len(&self) -> usize { self.fields.len() }
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves a dotted path. An exact key match wins; otherwise the path is
    /// split on its first `.` and the remainder is resolved on the related
    /// sub-record named by the head.
    pub fn resolve(&self, path: &str) -> Result<&Field> {
        if let Some(field) = self.fields.get(path) {
            return Ok(field);
        }
        let Some((head, rest)) = path.split_once('.') else {
            return Err(TransposeError::FieldNotFound(path.to_string()));
        };
        match self.fields.get(head) {
            Some(Field::Relation(related)) => related.resolve(rest),
            Some(Field::Value(_)) => Err(TransposeError::RelationMissing(format!(
                "'{}' is not a relation (remaining path '{}')", head, rest
            ))),
            None => Err(TransposeError::FieldNotFound(head.to_string())),
        }
    }

    pub fn value(&self, path: &str) -> Result<&ScalarValue> {
        match self.resolve(path)? {
            Field::Value(v) => Ok(v),
            Field::Relation(_) => Err(TransposeError::NotScalar(path.to_string())),
        }
    }

    /// Lenient lookup used for ordering and filtering: anything that does not
    /// resolve to a value reads as null.
    pub fn value_or_null(&self, path: &str) -> ScalarValue {
        self.value(path).cloned().unwrap_or(ScalarValue::Null)
    }
}
