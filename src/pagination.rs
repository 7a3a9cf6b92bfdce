//! Page bound calculation.
//!
//! Pages are measured in distinct groups, not in fetched records, so a page
//! window is first translated into a closed range of group key values and
//! only then used to restrict the fetch.
//!
//! The lower bound keeps a long-standing quirk: a positive offset is looked
//! up as a *value* among the group keys rather than used as a position. When
//! no key equals the offset, the last key becomes the lower bound. Callers
//! relying on positional offsets over non-numeric keys get an empty or
//! single-group window.

use crate::pivot::GroupKey;
use crate::source::Condition;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Offset and limit, both counted in distinct groups. A non-positive limit
/// disables pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(offset: i64, limit: i64) -> Self { Self { offset, limit } }
    pub fn none() -> Self { Self::default() }

    /// One-based page number to offset/limit.
    pub fn for_page(page: i64, per_page: i64) -> Self {
        Self { offset: (page - 1).max(0).saturating_mul(per_page.max(0)), limit: per_page }
    }

    pub fn is_paginated(&self) -> bool { self.limit > 0 }

    pub fn page_count(&self, total_groups: usize) -> usize {
        if !self.is_paginated() { return 1; }
        let limit = self.limit as usize;
        total_groups.div_ceil(limit).max(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBounds {
    pub lower: Option<GroupKey>,
    pub upper: Option<GroupKey>,
}

impl PageBounds {
    pub fn unbounded() -> Self { Self::default() }

    /// Range restriction for the fetch. Without an upper bound nothing is
    /// restricted, whatever the lower bound says.
    pub fn condition(&self, group_fields: &[String]) -> Option<Condition> {
        let upper = self.upper.as_ref()?;
        let low = self.lower.as_ref().map(|l| l.parts().to_vec());
        Some(Condition::between(group_fields, low, upper.parts().to_vec()))
    }
}

pub fn lower_bound(offset: i64, distinct_rows: &[GroupKey]) -> Option<GroupKey> {
    if offset <= 0 { return None; }
    match distinct_rows.iter().find(|k| k.equals_number(offset)) {
        Some(found) => Some(found.clone()),
        None => {
            let fallback = distinct_rows.last().cloned();
            debug!(offset, fallback = ?fallback, "offset not among group keys, using last key as lower bound");
            fallback
        }
    }
}

pub fn upper_bound(offset: i64, limit: i64, distinct_rows: &[GroupKey]) -> Option<GroupKey> {
    if limit <= 0 { return None; }
    let next_row = limit.saturating_add(offset).saturating_sub(1);
    usize::try_from(next_row).ok()
        .and_then(|i| distinct_rows.get(i))
        .or_else(|| distinct_rows.last())
        .cloned()
}

pub fn page_bounds(pagination: &Pagination, distinct_rows: &[GroupKey]) -> PageBounds {
    let bounds = PageBounds {
        lower: lower_bound(pagination.offset, distinct_rows),
        upper: upper_bound(pagination.offset, pagination.limit, distinct_rows),
    };
    debug!(offset = pagination.offset, limit = pagination.limit,
        lower = ?bounds.lower, upper = ?bounds.upper, "page bounds");
    bounds
}
