use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use contacts_core::{db::DbError, ContactId, ContactServiceError, RepoError};
use log::{error, warn};
use thiserror::Error;

use crate::{config::ConfigError, views};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("contact not found: {0}")]
    NotFound(ContactId),

    /// A route ran without its required path parameter.
    #[error("missing route parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("malformed payload")]
    MalformedPayload,

    #[error("store error: {0}")]
    Store(RepoError),

    #[error("contact store lock poisoned")]
    StorePoisoned,

    #[error("render error: {0}")]
    Render(#[from] askama::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(value: FormRejection) -> Self {
        warn!(
            "event=request_rejected module=web status=error http_status={} error={value}",
            value.status()
        );
        Self::MalformedPayload
    }
}

impl From<ContactServiceError> for AppError {
    fn from(value: ContactServiceError) -> Self {
        match value {
            ContactServiceError::ContactNotFound(id) => Self::NotFound(id),
            ContactServiceError::Repo(err) => Self::from(err),
            ContactServiceError::InconsistentState(details) => Self::Internal(details.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::MissingParameter { .. }
            | AppError::Store { .. }
            | AppError::StorePoisoned
            | AppError::Render { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("event=request_failed module=web status=error http_status={status} error={self}");
        }

        if let AppError::NotFound(_) = self {
            return match views::render_not_found() {
                Ok(body) => (status, Html(body)).into_response(),
                Err(_) => (status, "Not Found").into_response(),
            };
        }

        (status, self.to_string()).into_response()
    }
}

/// Failures while bringing the server up.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
