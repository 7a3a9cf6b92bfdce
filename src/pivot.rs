use crate::config::ExtraField;
use crate::error::Result;
use crate::label::column_label;
use crate::record::Record;
use crate::value::{compare_key_parts, concat_parts, ScalarValue};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{trace, warn};

/// Identifies one output row. Composite keys keep their parts, so two keys
/// with the same label stay distinct. Composite keys order by label, then by
/// parts; single keys order by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    parts: Vec<ScalarValue>,
}

impl GroupKey {
    pub fn new(parts: Vec<ScalarValue>) -> Self { Self { parts } }
    pub fn single(value: impl Into<ScalarValue>) -> Self { Self { parts: vec![value.into()] } }

    pub fn composite(a: impl Into<ScalarValue>, b: impl Into<ScalarValue>) -> Self {
        Self { parts: vec![a.into(), b.into()] }
    }

    pub fn from_record(record: &Record, fields: &[String]) -> Result<Self> {
        let parts = fields.iter()
            .map(|f| record.value(f).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[ScalarValue] { &self.parts }

    pub fn label(&self) -> String { concat_parts(&self.parts) }

    /// The parts as a JSON array, e.g. `["ma","t1"]`. Used where the label
    /// alone would be ambiguous.
    pub fn qualified_label(&self) -> String {
        serde_json::to_string(&self.parts).unwrap_or_else(|_| self.label())
    }

    /// Membership test used by the page bound calculator: only a single-part
    /// key holding a number (or numeric text) can equal an offset.
    pub fn equals_number(&self, n: i64) -> bool {
        self.parts.len() == 1 && self.parts[0].equals_number(n)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.label()) }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering { compare_key_parts(&self.parts, &other.parts) }
}

/// Column label / extra label -> cell value.
pub type PivotedRow = BTreeMap<String, ScalarValue>;

/// Pivoted output, iterated in ascending group key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    rows: BTreeMap<GroupKey, PivotedRow>,
}

impl PivotTable {
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn get(&self, key: &GroupKey) -> Option<&PivotedRow> { self.rows.get(key) }

    /// First row whose key renders as `label`. Composite keys can share a
    /// label; use [`PivotTable::get_all_by_label`] to see every one.
    pub fn get_by_label(&self, label: &str) -> Option<&PivotedRow> {
        self.rows.iter().find(|(k, _)| k.label() == label).map(|(_, row)| row)
    }

    pub fn get_all_by_label(&self, label: &str) -> Vec<(&GroupKey, &PivotedRow)> {
        self.rows.iter().filter(|(k, _)| k.label() == label).collect()
    }

    fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for key in self.rows.keys() {
            *counts.entry(key.label()).or_insert(0) += 1;
        }
        counts
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> { self.rows.keys() }
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &PivotedRow)> { self.rows.iter() }

    /// Renders the table as positional rows: the group label followed by one
    /// cell per header, with null where a row has no entry.
    pub fn to_rows(&self, headers: &[String]) -> Vec<Vec<ScalarValue>> {
        self.rows.iter().map(|(key, row)| {
            let mut cells = vec![ScalarValue::Utf8(key.label())];
            cells.extend(headers.iter().map(|h| row.get(h).cloned().unwrap_or(ScalarValue::Null)));
            cells
        }).collect()
    }

    pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }
}

/// A JSON object keyed by group label. Keys whose label is shared with
/// another row are written as their qualified label instead, so no row is
/// lost to a duplicate object key.
impl Serialize for PivotTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let counts = self.label_counts();
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (key, row) in &self.rows {
            let label = key.label();
            if counts.get(&label).copied().unwrap_or(0) > 1 {
                map.serialize_entry(&key.qualified_label(), row)?;
            } else {
                map.serialize_entry(&label, row)?;
            }
        }
        map.end()
    }
}

/// Maps each distinct column key to its label. Keys that sanitize to the same
/// label share one output column; the later key overwrites cells in a row.
pub fn column_index(columns: &[ScalarValue], strict: bool) -> BTreeMap<ScalarValue, String> {
    let mut index = BTreeMap::new();
    let mut owners: BTreeMap<String, &ScalarValue> = BTreeMap::new();
    for key in columns {
        let label = column_label(key, strict);
        match owners.get(&label) {
            Some(first) => warn!(label = %label, first = %first, second = %key, "column keys share a label"),
            None => { owners.insert(label.clone(), key); }
        }
        index.insert(key.clone(), label);
    }
    index
}

pub struct PivotLayout<'a> {
    pub group_fields: &'a [String],
    pub columns_field: &'a str,
    pub values_field: &'a str,
    pub columns: &'a BTreeMap<ScalarValue, String>,
    pub extra_fields: &'a [ExtraField],
}

/// Folds flat records into one row per group key. A record whose column value
/// is not among the known columns adds no cell but still applies its extra
/// fields.
pub fn pivot(records: &[Record], layout: &PivotLayout<'_>) -> Result<PivotTable> {
    let mut rows: BTreeMap<GroupKey, PivotedRow> = BTreeMap::new();
    for record in records {
        let key = GroupKey::from_record(record, layout.group_fields)?;
        let row = rows.entry(key).or_default();
        let column = record.value(layout.columns_field)?;
        match layout.columns.get(column) {
            Some(label) => {
                row.insert(label.clone(), record.value(layout.values_field)?.clone());
            }
            None => trace!(column = %column, "record column not among distinct columns"),
        }
        for extra in layout.extra_fields {
            row.insert(extra.label.clone(), record.value(&extra.path)?.clone());
        }
    }
    // Keys sharing a label are adjacent in group key order.
    let keys: Vec<&GroupKey> = rows.keys().collect();
    for pair in keys.windows(2) {
        if pair[0].label() == pair[1].label() {
            warn!(label = %pair[0].label(), first = %pair[0].qualified_label(), second = %pair[1].qualified_label(), "group keys share a label");
        }
    }
    Ok(PivotTable { rows })
}
