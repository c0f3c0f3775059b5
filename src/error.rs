//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::Envelope;

/// Unique constraint guarding `accounts.email`.
pub const ACCOUNT_EMAIL_CONSTRAINT: &str = "accounts_email_key";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures reported by a [`crate::store::Store`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },
    #[error("database: {0}")]
    Db(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            let constraint = db.constraint().unwrap_or_default().to_string();
            if db.is_unique_violation() {
                return StoreError::UniqueViolation { constraint };
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation { constraint };
            }
        }
        StoreError::Db(e)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Authorization token is missing.")]
    Missing,
    #[error("Invalid token.")]
    Invalid,
    #[error("Token has expired.")]
    Expired,
    #[error("Token is not yet valid.")]
    NotBefore,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Rejections from the single-field update endpoints.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field '{0}' cannot be updated.")]
    Forbidden(String),
    #[error("Field name is required.")]
    MissingField,
    #[error("Field value is required.")]
    MissingValue,
    #[error("Unknown field '{0}'.")]
    Unknown(String),
    #[error("Field '{field}' {expected}.")]
    InvalidValue { field: &'static str, expected: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Validation(String),
    /// Bad credentials on login or password change.
    #[error("{0}")]
    Auth(String),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0} is not implemented.")]
    Unimplemented(&'static str),
    #[error("internal: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Store(e.into())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Auth(_) | AppError::Field(_) => StatusCode::BAD_REQUEST,
            AppError::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Store(StoreError::UniqueViolation { .. })
            | AppError::Store(StoreError::ForeignKeyViolation { .. }) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::Db(_)) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unimplemented(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message shown to the client. Internal failures never leak their details.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Store(StoreError::UniqueViolation { constraint }) if constraint == ACCOUNT_EMAIL_CONSTRAINT => {
                "Email already exists.".into()
            }
            AppError::Store(StoreError::UniqueViolation { .. }) => "Duplicate field value entered.".into(),
            AppError::Store(StoreError::ForeignKeyViolation { .. }) => "Referenced resource does not exist.".into(),
            AppError::Store(StoreError::Db(_))
            | AppError::Config(_)
            | AppError::Internal(_)
            | AppError::Token(TokenError::Signing(_)) => "Server error.".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && !matches!(self, AppError::Unimplemented(_)) {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }
        (status, Json(Envelope::<()>::failure(self.public_message()))).into_response()
    }
}
