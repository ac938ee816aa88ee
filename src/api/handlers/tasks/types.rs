//! Request payloads for the task endpoints.
//!
//! Unknown fields (including any attempt to set `user_id`) are ignored; the
//! owner always comes from the bearer token.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::super::auth::types::present;
use crate::identity::AuthError;
use crate::tasks::{TaskChanges, TaskDraft, TaskPriority, TaskStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl CreateTaskRequest {
    pub(crate) fn into_draft(self) -> Result<TaskDraft, AuthError> {
        let mut missing = Vec::new();
        let title = present(self.title, "title", &mut missing)
            .ok_or(AuthError::MissingFields(missing))?;
        Ok(TaskDraft {
            title,
            description: self.description,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    /// Absent keeps the description; `null` clears it.
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl UpdateTaskRequest {
    pub(crate) fn into_changes(self) -> Result<TaskChanges, AuthError> {
        if self.title.as_deref().is_some_and(str::is_empty) {
            return Err(AuthError::BadRequest("Title cannot be empty".to_string()));
        }
        Ok(TaskChanges {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
        })
    }
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`,
/// via `#[serde(default)]`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}
