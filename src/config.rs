use crate::error::{Result, TransposeError};
use crate::pagination::Pagination;
use crate::source::{Condition, SortKey};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The field (or pair of fields) that identifies one output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupField {
    Single(String),
    Composite(Vec<String>),
}

impl GroupField {
    pub fn fields(&self) -> Vec<String> {
        match self {
            GroupField::Single(f) => vec![f.clone()],
            GroupField::Composite(fs) => fs.clone(),
        }
    }
}

impl From<&str> for GroupField {
    fn from(f: &str) -> Self { GroupField::Single(f.to_string()) }
}

impl From<(&str, &str)> for GroupField {
    fn from((a, b): (&str, &str)) -> Self { GroupField::Composite(vec![a.to_string(), b.to_string()]) }
}

/// A passthrough column copied from each record into its pivoted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraField {
    pub label: String,
    pub path: String,
}

impl ExtraField {
    pub fn new(label: &str, path: &str) -> Self {
        Self { label: label.to_string(), path: path.to_string() }
    }

    /// Declared without a label: the path doubles as the label.
    pub fn path(path: &str) -> Self { Self::new(path, path) }

    fn validate(&self) -> Result<()> {
        if self.label.is_empty() {
            return Err(TransposeError::Configuration(format!(
                "extra field for path '{}' has an empty label", self.path
            )));
        }
        if self.path.is_empty() || self.path.split('.').any(str::is_empty) {
            return Err(TransposeError::Configuration(format!(
                "extra field '{}' has a malformed path '{}'", self.label, self.path
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtraFieldsRepr {
    Map(BTreeMap<String, String>),
    List(Vec<String>),
}

fn deserialize_extra_fields<'de, D>(deserializer: D) -> std::result::Result<Vec<ExtraField>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ExtraFieldsRepr::deserialize(deserializer)? {
        ExtraFieldsRepr::Map(map) => map.iter().map(|(label, path)| ExtraField::new(label, path)).collect(),
        ExtraFieldsRepr::List(paths) => paths.iter().map(|p| ExtraField::path(p)).collect(),
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransposeConfig {
    pub group_field: GroupField,
    pub columns_field: String,
    pub values_field: String,
    #[serde(default, deserialize_with = "deserialize_extra_fields")]
    pub extra_fields: Vec<ExtraField>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub sort: Vec<SortKey>,
    /// Use the whole-token identifier check when deriving column labels.
    #[serde(default)]
    pub strict_labels: bool,
    /// Base criteria applied to every query the transposer issues.
    #[serde(skip)]
    pub conditions: Vec<Condition>,
}

impl TransposeConfig {
    pub fn new(group_field: impl Into<GroupField>, columns_field: &str, values_field: &str) -> Self {
        Self {
            group_field: group_field.into(),
            columns_field: columns_field.to_string(),
            values_field: values_field.to_string(),
            extra_fields: Vec::new(),
            pagination: Pagination::default(),
            sort: Vec::new(),
            strict_labels: false,
            conditions: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: TransposeConfig = serde_json::from_str(json)
            .map_err(|e| TransposeError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_extra_field(mut self, label: &str, path: &str) -> Self {
        self.extra_fields.push(ExtraField::new(label, path));
        self
    }

    pub fn with_extra_path(mut self, path: &str) -> Self {
        self.extra_fields.push(ExtraField::path(path));
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_sort(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_strict_labels(mut self, strict: bool) -> Self {
        self.strict_labels = strict;
        self
    }

    pub fn group_fields(&self) -> Vec<String> { self.group_field.fields() }

    pub fn extra_labels(&self) -> Vec<String> {
        self.extra_fields.iter().map(|e| e.label.clone()).collect()
    }

    pub fn validate(&self) -> Result<()> {
        let group = self.group_fields();
        if group.is_empty() || group.len() > 2 {
            return Err(TransposeError::Configuration(format!(
                "groupField must name one or two fields, got {}", group.len()
            )));
        }
        if let Some(bad) = group.iter().find(|f| f.is_empty()) {
            return Err(TransposeError::Configuration(format!("empty group field name {:?}", bad)));
        }
        if self.columns_field.is_empty() {
            return Err(TransposeError::Configuration("columnsField is empty".to_string()));
        }
        if self.values_field.is_empty() {
            return Err(TransposeError::Configuration("valuesField is empty".to_string()));
        }
        for extra in &self.extra_fields {
            extra.validate()?;
        }
        Ok(())
    }
}
