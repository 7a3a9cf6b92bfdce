//! The query capability a [`Transposer`](crate::transposer::Transposer) runs
//! against. Implementations build queries by value, the way a relational
//! query builder chains `select`/`distinct`/`order_by`/`where`, and only touch
//! the backing store in [`QuerySource::count`] and [`QuerySource::all`].

use crate::error::Result;
use crate::record::Record;
use crate::value::ScalarValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: &str) -> Self { Self { field: field.to_string(), descending: false } }
    pub fn desc(field: &str) -> Self { Self { field: field.to_string(), descending: true } }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals { field: String, value: ScalarValue },
    /// Closed range over the tuple of `fields`, compared in group key order.
    /// A missing `low` leaves the range open below.
    Between { fields: Vec<String>, low: Option<Vec<ScalarValue>>, high: Vec<ScalarValue> },
}

impl Condition {
    pub fn equals(field: &str, value: impl Into<ScalarValue>) -> Self {
        Condition::Equals { field: field.to_string(), value: value.into() }
    }

    pub fn between(fields: &[String], low: Option<Vec<ScalarValue>>, high: Vec<ScalarValue>) -> Self {
        Condition::Between { fields: fields.to_vec(), low, high }
    }
}

pub trait QuerySource: Clone {
    /// Reports whether this source can serve distinct/select/order queries.
    /// Sources that cannot should return a configuration error.
    fn check(&self) -> Result<()> { Ok(()) }

    fn select(self, fields: &[String]) -> Self;
    fn distinct(self) -> Self;
    fn order_by(self, keys: &[SortKey]) -> Self;
    fn filter(self, condition: Condition) -> Self;

    /// Number of non-null values of `field` in the current result set.
    fn count(&self, field: &str) -> Result<usize>;
    fn all(&self) -> Result<Vec<Record>>;
}
