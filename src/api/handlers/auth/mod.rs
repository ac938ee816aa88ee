//! Auth handlers and supporting modules.
//!
//! Registration and login exchange an email/password pair for a bearer
//! token; the profile endpoint and every task route sit behind the
//! [`Principal`](crate::identity::Principal) extractor in `principal`.
//!
//! ## Bearer tokens
//!
//! Tokens are stateless `HS256` JWTs signed with the server secret. They are
//! never stored and cannot be revoked; rotating the secret invalidates every
//! outstanding token.

pub(crate) mod login;
pub(crate) mod principal;
pub(crate) mod profile;
pub(crate) mod register;
mod state;
pub(crate) mod types;

use axum::extract::rejection::JsonRejection;
use tracing::debug;

use crate::identity::AuthError;

pub use state::{AuthConfig, AuthState};

/// Map a body that failed to decode as JSON to a `400`.
pub(crate) fn bad_json(rejection: JsonRejection) -> AuthError {
    debug!("Rejected request body: {}", rejection.body_text());
    AuthError::BadRequest("Invalid JSON body".to_string())
}
