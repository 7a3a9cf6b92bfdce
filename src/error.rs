use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransposeError {
    #[error("Configuration Error: {0}")]
    Configuration(String),
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Relation missing while resolving: {0}")]
    RelationMissing(String),
    #[error("Path resolves to a relation, not a value: {0}")]
    NotScalar(String),
    #[error("Query Source Error: {0}")]
    Source(String),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransposeError>;
