//! Single-task handlers. Ids that do not parse are treated like ids that do
//! not exist.

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    response::IntoResponse,
};

use super::super::auth::{bad_json, types::MessageResponse};
use super::types::{DeleteResponse, UpdateTaskRequest};
use crate::identity::{AuthError, Principal};
use crate::tasks::{OwnedTasks, Task};

fn task_id(raw: &str) -> Result<i64, AuthError> {
    raw.parse().map_err(|_| AuthError::NotFoundOrNotOwned)
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = i64, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task.", body = Task),
        (status = 400, description = "Empty title or invalid JSON.", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired bearer token.", body = MessageResponse),
        (status = 404, description = "No such task owned by the caller, or nothing to update.", body = MessageResponse),
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn update_task(
    principal: Principal,
    tasks: Extension<OwnedTasks>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let id = task_id(&id)?;
    let Json(request) = payload.map_err(bad_json)?;
    let task = tasks
        .update(&principal, id, request.into_changes()?)
        .await?;
    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted.", body = DeleteResponse),
        (status = 401, description = "Missing, invalid or expired bearer token.", body = MessageResponse),
        (status = 404, description = "No such task owned by the caller.", body = MessageResponse),
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn delete_task(
    principal: Principal,
    tasks: Extension<OwnedTasks>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AuthError> {
    tasks.delete(&principal, task_id(&id)?).await?;
    Ok(Json(DeleteResponse { success: true }))
}
