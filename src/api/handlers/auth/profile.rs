use axum::{Json, extract::Extension, response::IntoResponse};
use std::sync::Arc;

use super::types::MessageResponse;
use crate::identity::{AuthError, Principal};
use crate::users::{UserProfile, UserStore};

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile of the authenticated user.", body = UserProfile),
        (status = 401, description = "Missing, invalid or expired bearer token.", body = MessageResponse),
        (status = 404, description = "The token's user no longer exists.", body = MessageResponse),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn profile(
    principal: Principal,
    users: Extension<Arc<dyn UserStore>>,
) -> Result<impl IntoResponse, AuthError> {
    let user = users
        .find_by_id(principal.id)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    Ok(Json(user.profile()))
}
