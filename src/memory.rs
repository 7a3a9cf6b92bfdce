use crate::distinct::{distinct_by, distinct_records, project};
use crate::error::Result;
use crate::filter::filter_all;
use crate::record::Record;
use crate::sort::sort_by;
use crate::source::{Condition, QuerySource, SortKey};
use std::sync::Arc;

/// A [`QuerySource`] over records held in memory. Cloning is cheap: the
/// records are shared and only the query description is copied.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Arc<Vec<Record>>,
    selection: Option<Vec<String>>,
    distinct: bool,
    ordering: Vec<SortKey>,
    conditions: Vec<Condition>,
}

impl MemorySource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records: Arc::new(records), ..Self::default() }
    }

    /// Loads a JSON array of objects. Nested objects become relations.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

impl From<Vec<Record>> for MemorySource {
    fn from(records: Vec<Record>) -> Self { Self::new(records) }
}

impl QuerySource for MemorySource {
    fn select(mut self, fields: &[String]) -> Self {
        self.selection = Some(fields.to_vec());
        self
    }

    fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    fn order_by(mut self, keys: &[SortKey]) -> Self {
        self.ordering = keys.to_vec();
        self
    }

    fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    fn count(&self, field: &str) -> Result<usize> {
        Ok(self.all()?.iter().filter(|r| !r.value_or_null(field).is_null()).count())
    }

    fn all(&self) -> Result<Vec<Record>> {
        let mut rows = filter_all(self.records.as_ref().clone(), &self.conditions);
        sort_by(&mut rows, &self.ordering);
        match (&self.selection, self.distinct) {
            (Some(fields), distinct) => {
                rows = rows.iter().map(|r| project(r, fields)).collect::<Result<Vec<_>>>()?;
                if distinct { rows = distinct_by(rows, fields); }
            }
            (None, true) => rows = distinct_records(rows),
            (None, false) => {}
        }
        Ok(rows)
    }
}
