use pivot_transposer::{
    ExtraField, GroupField, MemorySource, Pagination, Record, SortKey, TransposeConfig, TransposeError,
    Transposer,
};
use pretty_assertions::assert_eq;

#[test]
fn test_full_json_config() {
    let config = TransposeConfig::from_json(r#"{
        "groupField": "student",
        "columnsField": "subject",
        "valuesField": "grade",
        "extraFields": {"role": "student.role.name", "class": "student.class"},
        "pagination": {"offset": 0, "limit": 20},
        "sort": [{"field": "grade", "descending": true}, {"field": "subject"}]
    }"#).unwrap();
    assert_eq!(config.group_field, GroupField::Single("student".to_string()));
    assert_eq!(config.extra_fields, vec![
        ExtraField::new("class", "student.class"),
        ExtraField::new("role", "student.role.name"),
    ]);
    assert_eq!(config.pagination, Pagination::new(0, 20));
    assert_eq!(config.sort, vec![SortKey::desc("grade"), SortKey::asc("subject")]);
    assert!(!config.strict_labels);
    assert!(config.conditions.is_empty());
}

#[test]
fn test_minimal_json_config_defaults() {
    let config = TransposeConfig::from_json(
        r#"{"groupField": ["course", "section"], "columnsField": "week", "valuesField": "present", "strictLabels": true}"#,
    ).unwrap();
    assert_eq!(config.group_fields(), vec!["course", "section"]);
    assert!(config.extra_fields.is_empty());
    assert_eq!(config.pagination, Pagination::none());
    assert!(config.strict_labels);
}

#[test]
fn test_extra_fields_as_list() {
    let config = TransposeConfig::from_json(
        r#"{"groupField": "s", "columnsField": "c", "valuesField": "v", "extraFields": ["student.name", "term"]}"#,
    ).unwrap();
    assert_eq!(config.extra_labels(), vec!["student.name", "term"]);
    assert_eq!(config.extra_fields[0].path, "student.name");
}

fn config_error(json: &str) -> bool {
    matches!(TransposeConfig::from_json(json), Err(TransposeError::Configuration(_)))
}

#[test]
fn test_malformed_configs() {
    assert!(config_error(r#"{"groupField": "s", "columnsField": "c", "valuesField": "v", "extraFields": 42}"#));
    assert!(config_error(r#"{"groupField": "s", "columnsField": "c", "valuesField": "v", "extraFields": [1, 2]}"#));
    assert!(config_error(r#"{"groupField": "s", "columnsField": "c", "valuesField": "v", "extraFields": {"x": "a..b"}}"#));
    assert!(config_error(r#"{"groupField": "s", "columnsField": "c", "valuesField": "v", "extraFields": {"": "a"}}"#));
    assert!(config_error(r#"{"groupField": ["a", "b", "c"], "columnsField": "c", "valuesField": "v"}"#));
    assert!(config_error(r#"{"groupField": [], "columnsField": "c", "valuesField": "v"}"#));
    assert!(config_error(r#"{"groupField": "s", "valuesField": "v"}"#));
    assert!(config_error(r#"{"groupField": "", "columnsField": "c", "valuesField": "v"}"#));
    assert!(config_error("not json"));
}

#[test]
fn test_json_config_drives_transposer() {
    let config = TransposeConfig::from_json(
        r#"{"groupField": "student", "columnsField": "subject", "valuesField": "grade", "extraFields": ["student"]}"#,
    ).unwrap();
    let source = MemorySource::new(vec![
        Record::new().with("student", "mat").with("subject", "cre").with("grade", 52),
    ]);
    let mut t = Transposer::new(source, config).unwrap();
    assert_eq!(t.headers().unwrap(), vec!["cre", "student"]);
    let table = t.transpose().unwrap();
    assert_eq!(table.get_by_label("mat").unwrap().len(), 2);
}
