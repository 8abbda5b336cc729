use thiserror::Error;

/// Errors raised while constructing or validating schema models.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid input: {what}")]
    InvalidInput { what: String },
    #[error("model invariant violated for `{object}`: {detail}")]
    InvariantViolation { object: String, detail: String },
}

/// Errors raised while pairing and diffing two models.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("diff invariant violated for `{object}`: {detail}")]
    InvariantViolation { object: String, detail: String },
}

/// Errors raised while rendering operations into SQL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("dialect `{dialect}` encountered unhandled operation `{operation}`")]
    UnhandledOperation { operation: String, dialect: String },
    #[error("dialect `{dialect}` does not support operation `{operation}`")]
    UnsupportedDialectFeature { operation: String, dialect: String },
    #[error("generation invariant violated for `{object}`: {detail}")]
    InvariantViolation { object: String, detail: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("diff error: {0}")]
    Diff(#[from] DiffError),
    #[error("generate error: {0}")]
    Generate(#[from] GenerateError),
}

pub type Result<T> = std::result::Result<T, Error>;
