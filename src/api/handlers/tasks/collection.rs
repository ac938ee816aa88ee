use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use super::super::auth::{bad_json, types::MessageResponse};
use super::types::CreateTaskRequest;
use crate::identity::{AuthError, Principal};
use crate::tasks::{OwnedTasks, Task};

#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Tasks owned by the caller, newest first.", body = [Task]),
        (status = 401, description = "Missing, invalid or expired bearer token.", body = MessageResponse),
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn list_tasks(
    principal: Principal,
    tasks: Extension<OwnedTasks>,
) -> Result<impl IntoResponse, AuthError> {
    Ok(Json(tasks.list(&principal).await?))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created and owned by the caller.", body = Task),
        (status = 400, description = "Missing title or invalid JSON.", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired bearer token.", body = MessageResponse),
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn create_task(
    principal: Principal,
    tasks: Extension<OwnedTasks>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(request) = payload.map_err(bad_json)?;
    let task = tasks.create(&principal, request.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(task)))
}
