//! Auth and ownership failures, and how they surface over HTTP.
//!
//! Several internal reasons deliberately share one external response:
//! every token failure is the same 401, and "not yours" is the same 404 as
//! "does not exist".

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::token::TokenError;
use crate::storage::StoreError;

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_EMAIL_TAKEN: &str = "Email already registered";
pub const MSG_INVALID_TOKEN: &str = "Invalid or expired token";
pub const MSG_TASK_NOT_FOUND: &str = "Task not found";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_INTERNAL: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredential,
    #[error("email already registered")]
    DuplicateIdentity,
    #[error("missing bearer token")]
    MissingToken,
    #[error("bearer token rejected: {0}")]
    Token(#[from] TokenError),
    #[error("task not found or not owned by the caller")]
    NotFoundOrNotOwned,
    #[error("user not found")]
    UserNotFound,
    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredential | Self::MissingToken | Self::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::DuplicateIdentity => StatusCode::CONFLICT,
            Self::NotFoundOrNotOwned | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::MissingFields(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing message. Never distinguishes token failure reasons.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidCredential => MSG_INVALID_CREDENTIALS.to_string(),
            Self::DuplicateIdentity => MSG_EMAIL_TAKEN.to_string(),
            Self::MissingToken | Self::Token(_) => MSG_INVALID_TOKEN.to_string(),
            Self::NotFoundOrNotOwned => MSG_TASK_NOT_FOUND.to_string(),
            Self::UserNotFound => MSG_USER_NOT_FOUND.to_string(),
            Self::MissingFields(fields) => format!("Missing fields: {}", fields.join(", ")),
            Self::BadRequest(message) => message.clone(),
            Self::Persistence(_) | Self::Internal(_) => MSG_INTERNAL.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    /// Server-side failures are logged here and surfaced as a bare `500`.
    fn into_response(self) -> Response {
        if matches!(self, Self::Persistence(_) | Self::Internal(_)) {
            error!("{self}");
        }
        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}
