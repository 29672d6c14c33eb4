use thiserror::Error;

/// Input file does not match the expected record schema. Always fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unexpected column '{0}' in station CSV")]
    UnexpectedColumn(String),

    #[error("missing required column '{0}' in station CSV")]
    MissingColumn(&'static str),

    #[error("duplicate column '{0}' in station CSV")]
    DuplicateColumn(String),
}
