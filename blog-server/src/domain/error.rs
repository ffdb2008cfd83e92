use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("You must be logged in")]
    Unauthenticated,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound(Uuid),
    #[error("Email already in use")]
    UserAlreadyExists(String),
    #[error("Post not found")]
    PostNotFound(Uuid),
    #[error("Comment not found")]
    CommentNotFound(Uuid),
    #[error("Parent comment not found")]
    ParentNotFound(Uuid),
    #[error("Project not found")]
    ProjectNotFound(Uuid),
    #[error("Task not found")]
    TaskNotFound(Uuid),
    #[error("Resource not found")]
    NotFound,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("Cannot reply to a reply (only one level of nesting allowed)")]
    NestingTooDeep,
    #[error("An unexpected error occurred")]
    Internal(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Internal(format!("database error: {err}"))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Unauthenticated | DomainError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::UserNotFound(_)
            | DomainError::PostNotFound(_)
            | DomainError::CommentNotFound(_)
            | DomainError::ParentNotFound(_)
            | DomainError::ProjectNotFound(_)
            | DomainError::TaskNotFound(_)
            | DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Validation(_) | DomainError::NestingTooDeep => StatusCode::BAD_REQUEST,
            DomainError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let DomainError::Internal(detail) = self {
            error!(%detail, "request failed with internal error");
        }
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: message.as_str(),
        })
    }
}
