use crate::{guard::GuardError, lister::ListError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("path required")]
    MissingPath,
    #[error("{0}")]
    BadRequest(String),
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    OpenFailed(String),
    #[error("{0}")]
    ReadFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingPath => "MissingPath",
            AppError::BadRequest(_) => "BadRequest",
            AppError::Forbidden => "Forbidden",
            AppError::OpenFailed(_) => "OpenFailed",
            AppError::ReadFailed(_) => "ReadFailed",
            AppError::RateLimited => "RateLimited",
            AppError::Internal(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingPath | AppError::BadRequest(_) | AppError::OpenFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::ReadFailed(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// The guard's reason stays in the logs; callers only ever see "forbidden".
impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        tracing::debug!(reason = %err, "path rejected");
        AppError::Forbidden
    }
}

impl From<ListError> for AppError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::Open(e) => AppError::OpenFailed(e.to_string()),
            ListError::Read(e) => AppError::ReadFailed(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.to_string(), code: self.code() };
        (self.status(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
