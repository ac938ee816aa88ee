use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    bad_json,
    state::AuthState,
    types::{AuthResponse, LoginRequest, MessageResponse},
};
use crate::identity::AuthError;
use crate::users::UserStore;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted; returns a bearer token and the profile.", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid JSON.", body = MessageResponse),
        (status = 401, description = "Unknown email or wrong password.", body = MessageResponse),
    ),
    tag = "auth"
)]
/// Unknown email and wrong password produce the same response, and both pay
/// for one password verification.
#[instrument(skip(auth, users, payload))]
pub async fn login(
    auth: Extension<Arc<AuthState>>,
    users: Extension<Arc<dyn UserStore>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(request) = payload.map_err(bad_json)?;
    let credentials = request.required()?;

    let user = users.find_by_email(&credentials.email).await?;
    let verifier = user.as_ref().map(|user| user.password_hash.clone());
    let verified = auth
        .verify_password(credentials.password, verifier)
        .await?;

    let Some(user) = user.filter(|_| verified) else {
        debug!("login rejected");
        return Err(AuthError::InvalidCredential);
    };

    let token = auth.issue_token(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.profile(),
    }))
}
