use sea_orm::DbErr;
use thiserror::Error;

/// Failures raised by a store engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("employee {0} already exists")]
    DuplicateId(i32),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("full name must contain a first and a last name, got {0:?}")]
    MalformedFullName(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type HrResult<T> = Result<T, HrError>;
