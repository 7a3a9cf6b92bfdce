use crate::error::{Result, TransposeError};
use crate::record::Record;
use crate::value::ScalarValue;
use std::collections::BTreeSet;

/// Flattens the selected dotted paths of `record` into a new record keyed by
/// the paths themselves. A path that crosses a null relation projects to
/// null, like an outer join would.
pub fn project(record: &Record, fields: &[String]) -> Result<Record> {
    let mut projected = Record::new();
    for field in fields {
        let value = match record.value(field) {
            Ok(v) => v.clone(),
            Err(TransposeError::RelationMissing(_)) => ScalarValue::Null,
            Err(e) => return Err(e),
        };
        projected = projected.with(field, value);
    }
    Ok(projected)
}

/// Keeps the first record for every distinct tuple of `fields`, preserving
/// input order.
pub fn distinct_by(records: Vec<Record>, fields: &[String]) -> Vec<Record> {
    let mut seen: BTreeSet<Vec<ScalarValue>> = BTreeSet::new();
    let mut result = Vec::new();
    for record in records {
        let key: Vec<ScalarValue> = fields.iter().map(|f| record.value_or_null(f)).collect();
        if seen.insert(key) {
            result.push(record);
        }
    }
    result
}

/// Distinct over every field a record carries, used when no projection has
/// been selected.
pub fn distinct_records(records: Vec<Record>) -> Vec<Record> {
    let mut result: Vec<Record> = Vec::new();
    for record in records {
        if !result.contains(&record) {
            result.push(record);
        }
    }
    result
}
