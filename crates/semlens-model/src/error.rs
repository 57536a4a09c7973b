use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("schema '{0}' is already registered")]
    DuplicateSchema(String),
    #[error("schema '{schema_id}' is invalid: {reason}")]
    InvalidSchema { schema_id: String, reason: String },
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
