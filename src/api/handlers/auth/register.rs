use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    bad_json,
    state::AuthState,
    types::{AuthResponse, MessageResponse, RegisterRequest},
};
use crate::identity::AuthError;
use crate::storage::StoreError;
use crate::users::{NewUser, UserStore};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created; returns a bearer token and the profile.", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid JSON.", body = MessageResponse),
        (status = 409, description = "Email already registered.", body = MessageResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(auth, users, payload))]
pub async fn register(
    auth: Extension<Arc<AuthState>>,
    users: Extension<Arc<dyn UserStore>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(request) = payload.map_err(bad_json)?;
    let registration = request.required()?;

    if users.find_by_email(&registration.email).await?.is_some() {
        return Err(AuthError::DuplicateIdentity);
    }

    let password_hash = auth.hash_password(registration.password).await?;
    let user = users
        .create(NewUser {
            email: registration.email,
            name: registration.name,
            password_hash,
        })
        .await
        .map_err(|err| match err {
            StoreError::Duplicate => AuthError::DuplicateIdentity,
            other => AuthError::Persistence(other),
        })?;

    let token = auth.issue_token(&user)?;
    debug!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.profile(),
        }),
    ))
}
