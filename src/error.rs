//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("unknown store backend: {0}")]
    UnknownStore(String),
}

/// Failure kinds reported by a [`Gateway`](crate::gateway::Gateway), independent of the backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("foreign key constraint violated: {0}")]
    ForeignKey(String),
    #[error("database: {0}")]
    Db(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(db.constraint().unwrap_or_default().to_string())
            }
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::ForeignKey(db.constraint().unwrap_or_default().to_string())
            }
            other => StoreError::Db(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Conflict(&'static str),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Store(StoreError),
    #[error("body: {0}")]
    Body(String),
}

impl AppError {
    /// Error mapper for routes where a uniqueness violation is an expected outcome.
    pub fn conflict(message: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |e| match e {
            StoreError::Conflict(_) => AppError::Conflict(message),
            other => other.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::NotFound,
            other => AppError::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Conflict(message) => (StatusCode::CONFLICT, message).into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            AppError::Store(ref e) => {
                tracing::error!(error = %e, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
            }
            AppError::Body(ref e) => {
                tracing::warn!(error = %e, "rejected request body");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
            }
        }
    }
}
