use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        if let ApiError::Internal(source) = self {
            error!(error = %source, "internal error while resolving GraphQL field");
        }
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        if let ApiError::InvalidInput(_) = self {
            err = err.extend_with(|_err, e| {
                e.set("type", "BAD_REQUEST");
            });
        }
        err
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}
