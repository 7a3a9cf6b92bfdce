use crate::record::Record;
use crate::source::Condition;
use crate::value::{compare_key_parts, ScalarValue};
use std::cmp::Ordering;

pub fn filter_by<F>(records: Vec<Record>, predicate: F) -> Vec<Record>
where
    F: Fn(&Record) -> bool,
{
    records.into_iter().filter(|r| predicate(r)).collect()
}

pub fn filter_all(records: Vec<Record>, conditions: &[Condition]) -> Vec<Record> {
    if conditions.is_empty() { return records; }
    filter_by(records, |r| conditions.iter().all(|c| matches(r, c)))
}

pub fn matches(record: &Record, condition: &Condition) -> bool {
    match condition {
        Condition::Equals { field, value } => record.value_or_null(field) == *value,
        // Ranges follow group key order, so composite tuples compare by
        // their concatenation first.
        Condition::Between { fields, low, high } => {
            let tuple: Vec<ScalarValue> = fields.iter().map(|f| record.value_or_null(f)).collect();
            let above_low = low.as_ref()
                .map(|l| compare_key_parts(&tuple, l) != Ordering::Less)
                .unwrap_or(true);
            above_low && compare_key_parts(&tuple, high) != Ordering::Greater
        }
    }
}
