//! Bearer-token authentication gate.
//!
//! Flow Overview: read `Authorization: Bearer <token>`, verify the token with
//! the shared [`TokenAuthority`], and hand the resulting [`Principal`] to the
//! handler as an argument. Handlers that take a `Principal` are unreachable
//! without a valid token.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::debug;

use super::state::AuthState;
use crate::identity::{AuthError, Principal, TokenAuthority, now_unix_seconds};

const BEARER_PREFIX: &str = "Bearer ";

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<Arc<AuthState>>()
            .ok_or_else(|| AuthError::Internal("auth state extension missing".to_string()))?;

        authenticate(&parts.headers, auth.tokens(), now_unix_seconds()).inspect_err(|err| {
            debug!("Rejected bearer token: {err}");
        })
    }
}

/// Resolve the bearer token in `headers` into a principal.
///
/// # Errors
/// [`AuthError::MissingToken`] when no usable bearer token is present (the
/// verifier is not called), [`AuthError::Token`] when verification fails.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenAuthority,
    now: i64,
) -> Result<Principal, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let claims = tokens.verify(token, now)?;
    Ok(Principal::from(claims))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}
