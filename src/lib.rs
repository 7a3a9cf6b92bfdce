//! Long-to-wide pivoting of query results.
//!
//! A [`Transposer`] takes a [`QuerySource`] whose rows are
//! `(group, column, value)` triples and produces one [`PivotedRow`] per
//! distinct group, with pagination counted in groups rather than in
//! underlying rows.

pub mod config;
pub mod distinct;
pub mod error;
pub mod filter;
pub mod label;
pub mod memory;
pub mod pagination;
pub mod pivot;
pub mod record;
pub mod sort;
pub mod source;
pub mod transposer;
pub mod value;

pub use config::{ExtraField, GroupField, TransposeConfig};
pub use error::{Result, TransposeError};
pub use memory::MemorySource;
pub use pagination::{PageBounds, Pagination};
pub use pivot::{GroupKey, PivotTable, PivotedRow};
pub use record::{Field, Record};
pub use source::{Condition, QuerySource, SortKey};
pub use transposer::{Page, Transposer};
pub use value::ScalarValue;
