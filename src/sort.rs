use crate::record::Record;
use crate::source::SortKey;
use crate::value::compare_scalar;
use std::cmp::Ordering;

/// Stable multi-key sort. Keys that do not resolve on a record read as null,
/// and nulls sort last in ascending order.
pub fn sort_by(records: &mut [Record], keys: &[SortKey]) {
    if keys.is_empty() { return; }
    records.sort_by(|a, b| compare_records(a, b, keys));
}

pub fn compare_records(a: &Record, b: &Record, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let va = a.value_or_null(&key.field);
        let vb = b.value_or_null(&key.field);
        let ord = compare_scalar(&va, &vb);
        if ord != Ordering::Equal {
            return if key.descending { ord.reverse() } else { ord };
        }
    }
    Ordering::Equal
}
