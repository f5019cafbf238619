use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use murmur_types::api::ErrorBody;

pub const INVALID_MESSAGE_DATA: &str = "Invalid message data";
pub const UPDATE_FAILED: &str = "Failed to update message";
pub const MESSAGE_TEXT_REQUIRED: &str = "Message text is required";

/// Failure outcomes of [`AccountDirectory::register`](crate::directory::AccountDirectory::register).
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("username must not be blank and password must be at least 4 characters")]
    InvalidAccount,

    #[error("username already exists")]
    DuplicateUsername,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Failure outcomes of [`MessageBoard::create`](crate::board::MessageBoard::create).
#[derive(Debug, Error)]
pub enum CreateError {
    #[error("message text must not be blank and must be at most 255 characters")]
    InvalidText,

    #[error("message author does not exist")]
    InvalidAuthor,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Failure outcomes of [`MessageBoard::update_text`](crate::board::MessageBoard::update_text).
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("message text must not be blank and must be at most 255 characters")]
    InvalidText,

    #[error("message not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid account data")]
    InvalidAccount,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Carries the client-facing reason; outcome details are only logged.
    #[error("{0}")]
    InvalidMessage(&'static str),

    #[error("An unexpected error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidAccount | ApiError::InvalidMessage(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateUsername => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(e) = &self {
            error!("Internal error: {:#}", e);
        }

        let body = ErrorBody {
            status: status.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::InvalidAccount => ApiError::InvalidAccount,
            RegisterError::DuplicateUsername => ApiError::DuplicateUsername,
            RegisterError::Store(e) => ApiError::Internal(e),
        }
    }
}

impl From<CreateError> for ApiError {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::Store(e) => ApiError::Internal(e),
            other => {
                debug!("Create rejected: {}", other);
                ApiError::InvalidMessage(INVALID_MESSAGE_DATA)
            }
        }
    }
}

impl From<UpdateError> for ApiError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::Store(e) => ApiError::Internal(e),
            other => {
                debug!("Update rejected: {}", other);
                ApiError::InvalidMessage(UPDATE_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_map_to_statuses() {
        assert_eq!(ApiError::from(RegisterError::InvalidAccount).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(RegisterError::DuplicateUsername).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(CreateError::InvalidAuthor).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(UpdateError::NotFound).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(UpdateError::Store(anyhow::anyhow!("disk full"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn message_failures_use_fixed_reasons() {
        assert_eq!(ApiError::from(CreateError::InvalidText).to_string(), "Invalid message data");
        assert_eq!(ApiError::from(CreateError::InvalidAuthor).to_string(), "Invalid message data");
        assert_eq!(ApiError::from(UpdateError::InvalidText).to_string(), "Failed to update message");
        assert_eq!(ApiError::from(UpdateError::NotFound).to_string(), "Failed to update message");
    }
}
