use crate::config::TransposeConfig;
use crate::error::Result;
use crate::label::column_label;
use crate::pagination::{page_bounds, PageBounds};
use crate::pivot::{column_index, pivot, GroupKey, PivotLayout, PivotTable};
use crate::record::Record;
use crate::source::{QuerySource, SortKey};
use crate::value::ScalarValue;
use tracing::{debug, trace};

/// One page of pivoted output together with what a renderer needs around it.
#[derive(Debug, Clone)]
pub struct Page {
    pub rows: PivotTable,
    pub headers: Vec<String>,
    pub total_groups: usize,
    pub page_count: usize,
    pub bounds: PageBounds,
}

/// Reshapes long-format query results into one row per group key.
///
/// The distinct row and column sets are resolved lazily and cached for the
/// lifetime of the instance. An instance is meant to serve a single request;
/// construct a fresh one per operation.
pub struct Transposer<S: QuerySource> {
    source: S,
    config: TransposeConfig,
    distinct_rows: Option<Vec<GroupKey>>,
    distinct_columns: Option<Vec<ScalarValue>>,
}

impl<S: QuerySource> Transposer<S> {
    pub fn new(source: S, config: TransposeConfig) -> Result<Self> {
        source.check()?;
        config.validate()?;
        Ok(Self { source, config, distinct_rows: None, distinct_columns: None })
    }

    pub fn config(&self) -> &TransposeConfig { &self.config }

    fn base_query(&self) -> S {
        self.config.conditions.iter()
            .fold(self.source.clone(), |q, c| q.filter(c.clone()))
    }

    fn group_ordering(&self) -> Vec<SortKey> {
        self.config.group_fields().iter().map(|f| SortKey::asc(f)).collect()
    }

    pub fn distinct_rows(&mut self) -> Result<&[GroupKey]> {
        if self.distinct_rows.is_none() {
            let fields = self.config.group_fields();
            let records = self.base_query()
                .select(&fields)
                .distinct()
                .order_by(&self.group_ordering())
                .all()?;
            let mut keys = records.iter()
                .map(|r| GroupKey::from_record(r, &fields))
                .collect::<Result<Vec<_>>>()?;
            // The source orders by tuple; composite keys order by label.
            keys.sort();
            debug!(count = keys.len(), "resolved distinct rows");
            self.distinct_rows = Some(keys);
        } else {
            trace!("distinct rows cached");
        }
        Ok(self.distinct_rows.as_deref().unwrap_or_default())
    }

    pub fn distinct_columns(&mut self) -> Result<&[ScalarValue]> {
        if self.distinct_columns.is_none() {
            let field = self.config.columns_field.clone();
            let records = self.base_query()
                .select(std::slice::from_ref(&field))
                .distinct()
                .order_by(&[SortKey::asc(&field)])
                .all()?;
            let columns = records.iter()
                .map(|r| r.value(&field).cloned())
                .collect::<Result<Vec<_>>>()?;
            debug!(count = columns.len(), "resolved distinct columns");
            self.distinct_columns = Some(columns);
        } else {
            trace!("distinct columns cached");
        }
        Ok(self.distinct_columns.as_deref().unwrap_or_default())
    }

    /// Sanitized labels of the distinct columns, in column key order. Keys
    /// that collapse onto the same label contribute it once.
    pub fn column_labels(&mut self) -> Result<Vec<String>> {
        let strict = self.config.strict_labels;
        let mut labels: Vec<String> = Vec::new();
        for key in self.distinct_columns()? {
            let label = column_label(key, strict);
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        Ok(labels)
    }

    pub fn headers(&mut self) -> Result<Vec<String>> {
        let mut headers = self.column_labels()?;
        headers.extend(self.config.extra_labels());
        Ok(headers)
    }

    /// Number of distinct group keys matching the base criteria. A composite
    /// key counts when any of its parts is non-null.
    pub fn total_groups(&self) -> Result<usize> {
        let fields = self.config.group_fields();
        let query = self.base_query().select(&fields).distinct();
        match fields.as_slice() {
            [] => Ok(0),
            [field] => query.count(field),
            _ => Ok(query.all()?.iter()
                .filter(|r| fields.iter().any(|f| !r.value_or_null(f).is_null()))
                .count()),
        }
    }

    pub fn page_bounds(&mut self) -> Result<PageBounds> {
        let pagination = self.config.pagination;
        if pagination.offset <= 0 && !pagination.is_paginated() {
            return Ok(PageBounds::unbounded());
        }
        Ok(page_bounds(&pagination, self.distinct_rows()?))
    }

    /// Runs the group-ordered fetch restricted to the current page window.
    pub fn fetch(&mut self) -> Result<Vec<Record>> {
        let bounds = self.page_bounds()?;
        let fields = self.config.group_fields();
        let mut ordering = self.group_ordering();
        ordering.extend(self.config.sort.iter().cloned());
        let mut query = self.base_query();
        if let Some(range) = bounds.condition(&fields) {
            query = query.filter(range);
        }
        let records = query.order_by(&ordering).all()?;
        debug!(count = records.len(), "fetched records");
        Ok(records)
    }

    pub fn pivot(&mut self, records: &[Record]) -> Result<PivotTable> {
        let columns = self.distinct_columns()?.to_vec();
        let index = column_index(&columns, self.config.strict_labels);
        let group_fields = self.config.group_fields();
        let layout = PivotLayout {
            group_fields: &group_fields,
            columns_field: &self.config.columns_field,
            values_field: &self.config.values_field,
            columns: &index,
            extra_fields: &self.config.extra_fields,
        };
        let table = pivot(records, &layout)?;
        debug!(records = records.len(), rows = table.len(), "pivoted");
        Ok(table)
    }

    pub fn transpose(&mut self) -> Result<PivotTable> {
        let records = self.fetch()?;
        self.pivot(&records)
    }

    pub fn page(&mut self) -> Result<Page> {
        let bounds = self.page_bounds()?;
        let rows = self.transpose()?;
        let headers = self.headers()?;
        let total_groups = self.total_groups()?;
        let page_count = self.config.pagination.page_count(total_groups);
        Ok(Page { rows, headers, total_groups, page_count, bounds })
    }
}
