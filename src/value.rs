use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A dynamically typed cell value. Query results are heterogeneous, so
/// every field of a record and every pivoted cell carries one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    Utf8(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool { matches!(self, ScalarValue::Null) }

    /// Loose numeric equality: numbers compare by value and text matches
    /// when it parses as a number equal to `n` (ids often come back as text).
    /// Booleans and nulls never match.
    pub fn equals_number(&self, n: i64) -> bool {
        match self {
            ScalarValue::Int64(i) => *i == n,
            ScalarValue::Float64(f) => *f == n as f64,
            ScalarValue::Utf8(s) => {
                let s = s.trim();
                s.parse::<i64>().map(|i| i == n)
                    .or_else(|_| s.parse::<f64>().map(|f| f == n as f64))
                    .unwrap_or(false)
            }
            _ => false,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            ScalarValue::Boolean(_) => 0,
            ScalarValue::Int64(_) | ScalarValue::Float64(_) => 1,
            ScalarValue::Utf8(_) => 2,
            ScalarValue::Null => 3,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::Int64(i) => write!(f, "{}", i),
            ScalarValue::Float64(v) => {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{:.1}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            ScalarValue::Utf8(s) => write!(f, "{}", s),
            ScalarValue::Null => write!(f, "NULL"),
        }
    }
}

/// Total order over scalars: booleans, then numbers (ints and floats compared
/// numerically), then text, with nulls sorting last.
pub fn compare_scalar(a: &ScalarValue, b: &ScalarValue) -> Ordering {
    match (a, b) {
        (ScalarValue::Null, ScalarValue::Null) => Ordering::Equal,
        (ScalarValue::Boolean(x), ScalarValue::Boolean(y)) => x.cmp(y),
        (ScalarValue::Int64(x), ScalarValue::Int64(y)) => x.cmp(y),
        (ScalarValue::Float64(x), ScalarValue::Float64(y)) => x.total_cmp(y),
        (ScalarValue::Int64(x), ScalarValue::Float64(y)) => (*x as f64).total_cmp(y),
        (ScalarValue::Float64(x), ScalarValue::Int64(y)) => x.total_cmp(&(*y as f64)),
        (ScalarValue::Utf8(x), ScalarValue::Utf8(y)) => x.cmp(y),
        _ => a.type_rank().cmp(&b.type_rank()),
    }
}

/// Renders key parts back to back, with no separator.
pub fn concat_parts(parts: &[ScalarValue]) -> String {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Order over group key tuples. A single value orders by value; a composite
/// orders by its concatenated rendering, with the parts breaking ties so
/// distinct tuples never compare equal.
pub fn compare_key_parts(a: &[ScalarValue], b: &[ScalarValue]) -> Ordering {
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }
    if a.len() > 1 {
        let ord = concat_parts(a).cmp(&concat_parts(b));
        if ord != Ordering::Equal { return ord; }
    }
    a.iter().zip(b.iter())
        .map(|(x, y)| compare_scalar(x, y))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool { compare_scalar(self, other) == Ordering::Equal }
}

impl Eq for ScalarValue {}

impl PartialOrd for ScalarValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScalarValue {
    fn cmp(&self, other: &Self) -> Ordering { compare_scalar(self, other) }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self { ScalarValue::Boolean(b) }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self { ScalarValue::Int64(i) }
}

impl From<i32> for ScalarValue {
    fn from(i: i32) -> Self { ScalarValue::Int64(i as i64) }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self { ScalarValue::Float64(f) }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self { ScalarValue::Utf8(s.to_string()) }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self { ScalarValue::Utf8(s) }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(ScalarValue::Null) }
}
